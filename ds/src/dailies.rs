//! Dailies - both stores under one data directory
//!
//! Owns the compound operations that touch both documents. A task-list change
//! is persisted first; reconciliation only runs once that write succeeded.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::checklist::Checklist;
use crate::checklist_store::ChecklistStore;
use crate::config_store::ConfigStore;
use crate::error::Result;

/// File name of the config document inside the data directory
pub const CONFIG_FILE: &str = "config.json";

/// File name of the checklist document inside the data directory
pub const CHECKLIST_FILE: &str = "checklists.json";

/// Outcome of adding or removing a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChange {
    /// 1-based task number the change applied to
    pub number: usize,
    pub description: String,
    /// Users whose checklists were reconciled afterwards
    pub users_reconciled: usize,
}

/// The config and checklist stores of one data directory
#[derive(Debug, Clone)]
pub struct Dailies {
    data_dir: PathBuf,
    config: ConfigStore,
    checklists: ChecklistStore,
}

impl Dailies {
    /// Open both stores, creating default documents on first run
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        debug!(data_dir = %data_dir.display(), "Dailies::open: called");
        Ok(Self {
            config: ConfigStore::open(data_dir.join(CONFIG_FILE))?,
            checklists: ChecklistStore::open(data_dir.join(CHECKLIST_FILE))?,
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn checklists(&self) -> &ChecklistStore {
        &self.checklists
    }

    /// Append a task and reconcile every checklist
    pub fn add_task(&self, description: &str) -> Result<TaskChange> {
        debug!(%description, "Dailies::add_task: called");
        let position = self.config.add_task(description)?;
        let tasks = self.config.get()?.tasks;
        let users_reconciled = self.checklists.reconcile_all(&tasks)?;
        Ok(TaskChange {
            number: position + 1,
            description: description.to_string(),
            users_reconciled,
        })
    }

    /// Remove the task at a 1-based position and reconcile every checklist
    pub fn remove_task(&self, number: usize) -> Result<TaskChange> {
        debug!(number, "Dailies::remove_task: called");
        let description = self.config.remove_task(number)?;
        let tasks = self.config.get()?.tasks;
        let users_reconciled = self.checklists.reconcile_all(&tasks)?;
        Ok(TaskChange {
            number,
            description,
            users_reconciled,
        })
    }

    /// Reconcile one user's checklist against the current tasks
    pub fn sync_user(&self, user_id: &str) -> Result<Checklist> {
        debug!(%user_id, "Dailies::sync_user: called");
        let tasks = self.config.get()?.tasks;
        self.checklists.sync_user(user_id, &tasks)
    }

    /// Reconcile one user's checklist, unless no tasks are configured
    ///
    /// With an empty task list nothing is written and `None` is returned, so
    /// no empty checklist is stored for the user.
    pub fn open_checklist(&self, user_id: &str) -> Result<Option<Checklist>> {
        debug!(%user_id, "Dailies::open_checklist: called");
        let tasks = self.config.get()?.tasks;
        if tasks.is_empty() {
            return Ok(None);
        }
        self.checklists.sync_user(user_id, &tasks).map(Some)
    }
}
