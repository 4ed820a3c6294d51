pub mod engine;
pub mod hub;
pub mod palette;
pub mod registry;
pub mod session;
pub mod timer;
