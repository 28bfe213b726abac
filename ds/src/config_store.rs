//! ConfigStore - the global task list and the authorized role

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::document::Document;
use crate::error::{Result, StoreError};

/// Longest accepted task description, in characters
pub const MAX_TASK_CHARS: usize = 200;

/// Contents of `config.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Role whose members may use checklists
    pub role_id: Option<u64>,

    /// Ordered task descriptions; position is the task's identity
    pub tasks: Vec<String>,
}

/// Store for [`TaskConfig`]
///
/// Each operation reads the whole document, applies its change and writes the
/// whole document back.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    doc: Document<TaskConfig>,
}

impl ConfigStore {
    /// Open the store, creating an empty config if none exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            doc: Document::open(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    pub fn get(&self) -> Result<TaskConfig> {
        debug!("ConfigStore::get: called");
        self.doc.load()
    }

    pub fn set_role(&self, role_id: u64) -> Result<()> {
        debug!(role_id, "ConfigStore::set_role: called");
        let mut config = self.doc.load()?;
        config.role_id = Some(role_id);
        self.doc.save(&config)?;
        info!(role_id, "Authorized role set");
        Ok(())
    }

    /// Append a task, returning its 0-based position
    pub fn add_task(&self, description: &str) -> Result<usize> {
        debug!(%description, "ConfigStore::add_task: called");
        if description.trim().is_empty() {
            return Err(StoreError::InvalidArgument("task description cannot be empty".to_string()));
        }
        let chars = description.chars().count();
        if chars > MAX_TASK_CHARS {
            return Err(StoreError::InvalidArgument(format!(
                "task description is {} characters, the limit is {}",
                chars, MAX_TASK_CHARS
            )));
        }

        let mut config = self.doc.load()?;
        config.tasks.push(description.to_string());
        self.doc.save(&config)?;

        let position = config.tasks.len() - 1;
        info!(position, %description, "Task added");
        Ok(position)
    }

    /// Remove the task at a 1-based position, returning its description
    pub fn remove_task(&self, position: usize) -> Result<String> {
        debug!(position, "ConfigStore::remove_task: called");
        let mut config = self.doc.load()?;

        if position < 1 || position > config.tasks.len() {
            return Err(StoreError::InvalidArgument(format!(
                "task number {} is out of range 1..={}",
                position,
                config.tasks.len()
            )));
        }

        let removed = config.tasks.remove(position - 1);
        self.doc.save(&config)?;

        info!(position, description = %removed, "Task removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn open_store(temp: &TempDir) -> ConfigStore {
        ConfigStore::open(temp.path().join("config.json")).unwrap()
    }

    #[test]
    fn test_first_run_document() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"role_id": null, "tasks": []}));
        assert_eq!(store.get().unwrap(), TaskConfig::default());
    }

    #[test]
    fn test_set_role() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        store.set_role(1234567890123).unwrap();
        store.set_role(42).unwrap();
        assert_eq!(store.get().unwrap().role_id, Some(42));
    }

    #[test]
    fn test_add_task_returns_position() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        assert_eq!(store.add_task("Run the dungeon").unwrap(), 0);
        assert_eq!(store.add_task("Gather herbs").unwrap(), 1);
        assert_eq!(store.add_task("Gather herbs").unwrap(), 2);
        assert_eq!(store.get().unwrap().tasks.len(), 3);
    }

    #[test]
    fn test_add_blank_task_rejected() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        assert!(matches!(store.add_task("   "), Err(StoreError::InvalidArgument(_))));
        assert!(store.get().unwrap().tasks.is_empty());
    }

    #[test]
    fn test_add_overlong_task_rejected() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        assert_eq!(store.add_task(&"é".repeat(MAX_TASK_CHARS)).unwrap(), 0);
        let err = store.add_task(&"x".repeat(MAX_TASK_CHARS + 1)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
        assert_eq!(store.get().unwrap().tasks.len(), 1);
    }

    #[test]
    fn test_remove_task_shifts_positions() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);
        for t in ["A", "B", "C"] {
            store.add_task(t).unwrap();
        }

        assert_eq!(store.remove_task(2).unwrap(), "B");
        assert_eq!(store.get().unwrap().tasks, vec!["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_remove_task_bounds() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);
        for t in ["A", "B"] {
            store.add_task(t).unwrap();
        }

        assert!(matches!(store.remove_task(0), Err(StoreError::InvalidArgument(_))));
        assert!(matches!(store.remove_task(3), Err(StoreError::InvalidArgument(_))));
        assert_eq!(store.get().unwrap().tasks, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_reads_legacy_document_format() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"role_id": 987654321098765432, "tasks": ["Daily quest", "Faction mission"]}"#).unwrap();

        let store = ConfigStore::open(&path).unwrap();
        let config = store.get().unwrap();
        assert_eq!(config.role_id, Some(987654321098765432));
        assert_eq!(config.tasks[1], "Faction mission");
    }
}
