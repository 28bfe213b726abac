//! DailyStore - daily checklist state
//!
//! Keeps a global, ordered task list and every user's completion state for
//! it. Checklists are re-derived from the task list whenever it changes and
//! cleared once a day.
//!
//! # Layout
//!
//! ```text
//! {data_dir}/
//! ├── config.json       # {"role_id": u64|null, "tasks": [str]}
//! ├── checklists.json   # {user_id: {slot: {"description": str, "completed": bool}}}
//! └── .lock             # advisory writer lock
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dailystore::{Dailies, StoreLock};
//!
//! let _lock = StoreLock::acquire("data")?;
//! let dailies = Dailies::open("data")?;
//! dailies.add_task("Run the daily dungeon")?;
//! let checklist = dailies.sync_user("123456789")?;
//! dailies.checklists().toggle("123456789", 1)?;
//! ```

mod checklist;
mod checklist_store;
mod config_store;
mod dailies;
mod document;
mod error;
mod lock;
mod reconcile;

pub use checklist::{Checklist, ChecklistCollection, ChecklistEntry, reset_all};
pub use checklist_store::ChecklistStore;
pub use config_store::{ConfigStore, MAX_TASK_CHARS, TaskConfig};
pub use dailies::{CHECKLIST_FILE, CONFIG_FILE, Dailies, TaskChange};
pub use error::{Result, StoreError};
pub use lock::StoreLock;
pub use reconcile::{reconcile_all, reconcile_user};
