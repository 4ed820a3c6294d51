//! HTTP routes: health check and the socket upgrade, plus shared state.

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::game::hub::HubHandle;
use crate::ws::connection::ws_handler;

#[derive(Clone)]
pub struct AppState {
    pub hub: HubHandle,
}

pub async fn healthz() -> &'static str { "ok" }

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/ws", get(ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
