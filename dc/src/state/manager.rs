//! StateManager - actor that owns the config and checklist stores
//!
//! Processes commands via channels so that no two store operations overlap.

use std::path::Path;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use dailystore::{Checklist, Dailies, StoreError, StoreLock, TaskChange, TaskConfig};

use super::messages::{StateCommand, StateError, StateResponse, Toggled};

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Lock the data directory, open both stores and spawn the actor
    pub fn spawn(data_dir: impl AsRef<Path>) -> eyre::Result<Self> {
        debug!(data_dir = %data_dir.as_ref().display(), "spawn: called");
        let lock = StoreLock::acquire(data_dir.as_ref())?;
        let dailies = Dailies::open(data_dir.as_ref())?;

        let (tx, rx) = mpsc::channel(256);

        // Spawn the actor task
        tokio::spawn(actor_loop(lock, dailies, rx));

        info!("StateManager spawned");

        Ok(Self { tx })
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<StateResponse<T>>) -> StateCommand,
    ) -> StateResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    // === Config operations ===

    /// Get the task list and authorized role
    pub async fn get_config(&self) -> StateResponse<TaskConfig> {
        debug!("get_config: called");
        self.request(|reply| StateCommand::GetConfig { reply }).await
    }

    /// Set the role allowed to use checklists
    pub async fn set_role(&self, role_id: u64) -> StateResponse<()> {
        debug!(role_id, "set_role: called");
        self.request(|reply| StateCommand::SetRole { role_id, reply }).await
    }

    /// Add a task and reconcile all checklists
    pub async fn add_task(&self, description: &str) -> StateResponse<TaskChange> {
        debug!(%description, "add_task: called");
        self.request(|reply| StateCommand::AddTask {
            description: description.to_string(),
            reply,
        })
        .await
    }

    /// Remove the task with the given 1-based number and reconcile all checklists
    pub async fn remove_task(&self, number: usize) -> StateResponse<TaskChange> {
        debug!(number, "remove_task: called");
        self.request(|reply| StateCommand::RemoveTask { number, reply }).await
    }

    // === Checklist operations ===

    /// Get the user's checklist, reconciled against the current tasks
    pub async fn sync_user(&self, user_id: &str) -> StateResponse<Checklist> {
        debug!(%user_id, "sync_user: called");
        self.request(|reply| StateCommand::SyncUser {
            user_id: user_id.to_string(),
            reply,
        })
        .await
    }

    /// Like [`StateManager::sync_user`], but `None` without writing when no tasks exist
    pub async fn open_checklist(&self, user_id: &str) -> StateResponse<Option<Checklist>> {
        debug!(%user_id, "open_checklist: called");
        self.request(|reply| StateCommand::OpenChecklist {
            user_id: user_id.to_string(),
            reply,
        })
        .await
    }

    /// Toggle the task with the given 1-based number
    pub async fn toggle(&self, user_id: &str, number: usize) -> StateResponse<Toggled> {
        debug!(%user_id, number, "toggle: called");
        self.request(|reply| StateCommand::Toggle {
            user_id: user_id.to_string(),
            number,
            reply,
        })
        .await
    }

    /// Clear all completion flags, returning the number cleared
    pub async fn reset_all(&self) -> StateResponse<usize> {
        debug!("reset_all: called");
        self.request(|reply| StateCommand::ResetAll { reply }).await
    }

    /// Remove a user's checklist
    pub async fn evict_user(&self, user_id: &str) -> StateResponse<bool> {
        debug!(%user_id, "evict_user: called");
        self.request(|reply| StateCommand::EvictUser {
            user_id: user_id.to_string(),
            reply,
        })
        .await
    }

    /// Shutdown the StateManager, releasing the data directory lock
    pub async fn shutdown(&self) -> Result<(), StateError> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| StateError::ChannelError)
    }
}

fn toggle(dailies: &Dailies, user_id: &str, number: usize) -> StateResponse<Toggled> {
    let completed = dailies.checklists().toggle(user_id, number)?;
    let checklist = dailies
        .checklists()
        .get_user(user_id)?
        .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
    Ok(Toggled { completed, checklist })
}

/// The actor loop that processes commands
async fn actor_loop(lock: StoreLock, dailies: Dailies, mut rx: mpsc::Receiver<StateCommand>) {
    debug!(lock = %lock.path().display(), "StateManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::GetConfig { reply } => {
                debug!("actor_loop: GetConfig command");
                let _ = reply.send(dailies.config().get().map_err(StateError::from));
            }

            StateCommand::SetRole { role_id, reply } => {
                debug!(role_id, "actor_loop: SetRole command");
                let _ = reply.send(dailies.config().set_role(role_id).map_err(StateError::from));
            }

            StateCommand::AddTask { description, reply } => {
                debug!(%description, "actor_loop: AddTask command");
                let _ = reply.send(dailies.add_task(&description).map_err(StateError::from));
            }

            StateCommand::RemoveTask { number, reply } => {
                debug!(number, "actor_loop: RemoveTask command");
                let _ = reply.send(dailies.remove_task(number).map_err(StateError::from));
            }

            StateCommand::SyncUser { user_id, reply } => {
                debug!(%user_id, "actor_loop: SyncUser command");
                let _ = reply.send(dailies.sync_user(&user_id).map_err(StateError::from));
            }

            StateCommand::OpenChecklist { user_id, reply } => {
                debug!(%user_id, "actor_loop: OpenChecklist command");
                let _ = reply.send(dailies.open_checklist(&user_id).map_err(StateError::from));
            }

            StateCommand::Toggle { user_id, number, reply } => {
                debug!(%user_id, number, "actor_loop: Toggle command");
                let _ = reply.send(toggle(&dailies, &user_id, number));
            }

            StateCommand::ResetAll { reply } => {
                debug!("actor_loop: ResetAll command");
                let _ = reply.send(dailies.checklists().reset_all().map_err(StateError::from));
            }

            StateCommand::EvictUser { user_id, reply } => {
                debug!(%user_id, "actor_loop: EvictUser command");
                let _ = reply.send(dailies.checklists().evict_user(&user_id).map_err(StateError::from));
            }

            StateCommand::Shutdown => {
                debug!("actor_loop: Shutdown command");
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("StateManager actor stopped");
}
