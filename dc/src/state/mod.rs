//! State management with actor pattern
//!
//! StateManager owns both stores and processes messages via channels, so
//! every mutation (commands and the daily reset alike) runs one at a time.

mod manager;
mod messages;

pub use manager::StateManager;
pub use messages::{StateCommand, StateError, StateResponse, Toggled};
