//! Server for a three-player color-description party game.
//!
//! Players receive a secret palette color each round, describe it in words,
//! then guess one another's colors from the descriptions. Sessions live only
//! in memory, inside a single hub task.

pub mod config;
pub mod game;
pub mod http;
pub mod telemetry;
pub mod util;
pub mod ws;
