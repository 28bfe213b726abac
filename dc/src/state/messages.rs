//! State manager messages
//!
//! Commands and responses for the actor pattern.

use dailystore::{Checklist, StoreError, TaskChange, TaskConfig};
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors from state operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Channel error")]
    ChannelError,
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Result of toggling a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggled {
    /// New completion state of the toggled task
    pub completed: bool,
    /// The user's checklist after the change
    pub checklist: Checklist,
}

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    // Config operations
    GetConfig {
        reply: oneshot::Sender<StateResponse<TaskConfig>>,
    },
    SetRole {
        role_id: u64,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    AddTask {
        description: String,
        reply: oneshot::Sender<StateResponse<TaskChange>>,
    },
    RemoveTask {
        number: usize,
        reply: oneshot::Sender<StateResponse<TaskChange>>,
    },

    // Checklist operations
    SyncUser {
        user_id: String,
        reply: oneshot::Sender<StateResponse<Checklist>>,
    },
    OpenChecklist {
        user_id: String,
        reply: oneshot::Sender<StateResponse<Option<Checklist>>>,
    },
    Toggle {
        user_id: String,
        number: usize,
        reply: oneshot::Sender<StateResponse<Toggled>>,
    },
    ResetAll {
        reply: oneshot::Sender<StateResponse<usize>>,
    },
    EvictUser {
        user_id: String,
        reply: oneshot::Sender<StateResponse<bool>>,
    },

    // Shutdown
    Shutdown,
}
