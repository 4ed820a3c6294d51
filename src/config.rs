//! Configuration utilities (port, round timing) read from env vars.

use std::{env, net::{Ipv4Addr, SocketAddr}, time::Duration};

/// Default description-phase deadline.
pub const DEFAULT_DESCRIPTION_SECS: u64 = 30;
/// Default pause between a round's scoring and the next round.
pub const DEFAULT_ROUND_PAUSE_SECS: u64 = 3;

/// Socket address to bind the server to.
///
/// Reads the `PORT` env var or defaults to 8080, binds to 0.0.0.0.
pub fn server_addr() -> SocketAddr {
    let port = parse_or(env::var("PORT").ok(), 8080u16);
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Deadlines driving the round timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub description_deadline: Duration,
    pub round_pause: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            description_deadline: Duration::from_secs(DEFAULT_DESCRIPTION_SECS),
            round_pause: Duration::from_secs(DEFAULT_ROUND_PAUSE_SECS),
        }
    }
}

impl Timing {
    /// Reads `DESCRIPTION_SECS` and `ROUND_PAUSE_SECS`; unset or unparsable
    /// values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("DESCRIPTION_SECS").ok(),
            env::var("ROUND_PAUSE_SECS").ok(),
        )
    }

    fn from_values(description: Option<String>, pause: Option<String>) -> Self {
        Self {
            description_deadline: Duration::from_secs(parse_or(description, DEFAULT_DESCRIPTION_SECS)),
            round_pause: Duration::from_secs(parse_or(pause, DEFAULT_ROUND_PAUSE_SECS)),
        }
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}
