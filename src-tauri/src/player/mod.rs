pub mod commands;
pub mod controller;
pub mod state;

pub use controller::{PlayerController, PlayerSnapshot};
pub use state::{PlayerState, TickOutcome, DEFAULT_AUTO_ADVANCE_MS};
