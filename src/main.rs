use hue_guess::config::{self, Timing};
use hue_guess::game::{engine::Engine, hub};
use hue_guess::http::routes::{self, AppState};
use hue_guess::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let timing = Timing::from_env();
    tracing::info!(?timing, "round timing");
    let state = AppState { hub: hub::spawn(Engine::new(timing)) };
    let app = routes::router(state);

    let addr = config::server_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
