//! Scheduler for the daily checklist reset
//!
//! Fires once a day at a fixed local time and clears every completion flag
//! through the StateManager. Missed fires are not made up.

mod daily;

pub use daily::{DailyReset, next_fire};
