//! ChecklistStore - per-user completion state

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::checklist::{Checklist, ChecklistCollection, reset_all};
use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::reconcile::{reconcile_all, reconcile_user};

/// Store for the [`ChecklistCollection`] document
#[derive(Debug, Clone)]
pub struct ChecklistStore {
    doc: Document<ChecklistCollection>,
}

impl ChecklistStore {
    /// Open the store, creating an empty collection if none exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            doc: Document::open(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    pub fn get_all(&self) -> Result<ChecklistCollection> {
        debug!("ChecklistStore::get_all: called");
        self.doc.load()
    }

    pub fn save_all(&self, collection: &ChecklistCollection) -> Result<()> {
        debug!(users = collection.len(), "ChecklistStore::save_all: called");
        self.doc.save(collection)
    }

    /// Get a user's stored checklist without reconciling it
    pub fn get_user(&self, user_id: &str) -> Result<Option<Checklist>> {
        debug!(%user_id, "ChecklistStore::get_user: called");
        Ok(self.doc.load()?.remove(user_id))
    }

    /// Flip completion of the task at a 1-based position, returning the new state
    ///
    /// The user must already have a checklist (see [`ChecklistStore::sync_user`]).
    pub fn toggle(&self, user_id: &str, position: usize) -> Result<bool> {
        debug!(%user_id, position, "ChecklistStore::toggle: called");
        let mut collection = self.doc.load()?;

        let checklist = collection
            .get_mut(user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;

        let entry = position
            .checked_sub(1)
            .and_then(|slot| checklist.get_mut(slot))
            .ok_or_else(|| StoreError::SlotNotFound {
                user_id: user_id.to_string(),
                position,
            })?;

        entry.completed = !entry.completed;
        let completed = entry.completed;

        self.doc.save(&collection)?;
        debug!(%user_id, position, completed, "ChecklistStore::toggle: saved");
        Ok(completed)
    }

    /// Create the user's checklist if needed and align it with `tasks`
    pub fn sync_user(&self, user_id: &str, tasks: &[String]) -> Result<Checklist> {
        debug!(%user_id, tasks = tasks.len(), "ChecklistStore::sync_user: called");
        let mut collection = self.doc.load()?;

        let old = collection.remove(user_id).unwrap_or_default();
        let new = reconcile_user(tasks, &old);
        collection.insert(user_id.to_string(), new.clone());

        self.doc.save(&collection)?;
        Ok(new)
    }

    /// Align every user's checklist with `tasks` in one write
    pub fn reconcile_all(&self, tasks: &[String]) -> Result<usize> {
        debug!(tasks = tasks.len(), "ChecklistStore::reconcile_all: called");
        let mut collection = self.doc.load()?;
        let users = reconcile_all(tasks, &mut collection);
        self.doc.save(&collection)?;
        info!(users, "Checklists reconciled");
        Ok(users)
    }

    /// Clear every completion flag for every user, returning the count cleared
    pub fn reset_all(&self) -> Result<usize> {
        debug!("ChecklistStore::reset_all: called");
        let mut collection = self.doc.load()?;
        let cleared = reset_all(&mut collection);
        self.doc.save(&collection)?;
        info!(users = collection.len(), cleared, "Checklists reset");
        Ok(cleared)
    }

    /// Drop a user's checklist, returning whether one existed
    pub fn evict_user(&self, user_id: &str) -> Result<bool> {
        debug!(%user_id, "ChecklistStore::evict_user: called");
        let mut collection = self.doc.load()?;
        if collection.remove(user_id).is_none() {
            return Ok(false);
        }
        self.doc.save(&collection)?;
        info!(%user_id, "Checklist evicted");
        Ok(true)
    }
}
