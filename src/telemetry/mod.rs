//! Tracing initialization.

use tracing_subscriber::{fmt, EnvFilter, prelude::*};

/// Filter used when `RUST_LOG` is unset: game lifecycle at info, HTTP access lines too.
pub const DEFAULT_FILTER: &str = "info,hue_guess=info,tower_http=info,axum=info";

/// Install the global subscriber. `RUST_LOG` overrides [`DEFAULT_FILTER`], e.g.
/// `RUST_LOG=hue_guess=debug` to see ignored actions and stale timers.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
