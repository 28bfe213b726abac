//! DailyCheck - Discord bot for per-user daily checklists
//!
//! Administrators maintain one shared task list; every member holding the
//! configured role gets a personal checklist derived from it. Checklists are
//! reconciled whenever the task list changes and all completion flags are
//! cleared once a day.
//!
//! # Modules
//!
//! - [`state`] - Actor owning the stores; serializes every mutation
//! - [`scheduler`] - Daily reset timer
//! - [`bot`] - Discord command parsing, authorization and rendering
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//!
//! Persistence and reconciliation live in the `dailystore` crate.

pub mod bot;
pub mod cli;
pub mod config;
pub mod scheduler;
pub mod state;

pub use config::{Config, DiscordConfig, ScheduleConfig, StorageConfig};
pub use scheduler::{DailyReset, next_fire};
pub use state::{StateCommand, StateError, StateManager, StateResponse, Toggled};
