//! Whole-document JSON persistence
//!
//! Every read parses the entire file and every write replaces it: the new
//! content goes to `<file>.tmp` first and is renamed over the old file, so a
//! failed write leaves the previous document in place.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, StoreError};

/// A JSON document on disk holding one `T`
#[derive(Debug, Clone)]
pub(crate) struct Document<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> Document<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Open the document, writing `T::default()` if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let doc = Self {
            path: path.into(),
            _marker: PhantomData,
        };
        debug!(path = %doc.path.display(), "Document::open: called");

        if !doc.path.exists() {
            if let Some(parent) = doc.path.parent() {
                fs::create_dir_all(parent).map_err(|e| StoreError::storage(parent, e))?;
            }
            debug!(path = %doc.path.display(), "Document::open: creating with default content");
            doc.save(&T::default())?;
        }

        Ok(doc)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole document
    pub fn load(&self) -> Result<T> {
        debug!(path = %self.path.display(), "Document::load: called");
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::storage(&self.path, e))?;
        serde_json::from_str(&content).map_err(|e| StoreError::storage(&self.path, e))
    }

    /// Serialize `value` and atomically replace the document
    pub fn save(&self, value: &T) -> Result<()> {
        debug!(path = %self.path.display(), "Document::save: called");
        let body = serde_json::to_string_pretty(value).map_err(|e| StoreError::storage(&self.path, e))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, body).map_err(|e| StoreError::storage(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::storage(&self.path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    type Doc = BTreeMap<String, Vec<String>>;

    #[test]
    fn test_open_creates_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("doc.json");

        let doc: Document<Doc> = Document::open(&path).unwrap();
        assert!(path.exists());
        assert!(doc.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_open_keeps_existing_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.json");
        fs::write(&path, r#"{"a": ["x"]}"#).unwrap();

        let doc: Document<Doc> = Document::open(&path).unwrap();
        assert_eq!(doc.load().unwrap()["a"], vec!["x".to_string()]);
    }

    #[test]
    fn test_save_replaces_whole_document() {
        let temp = TempDir::new().unwrap();
        let doc: Document<Doc> = Document::open(temp.path().join("doc.json")).unwrap();

        let mut value = Doc::new();
        value.insert("a".to_string(), vec!["1".to_string()]);
        doc.save(&value).unwrap();

        value.remove("a");
        value.insert("b".to_string(), vec![]);
        doc.save(&value).unwrap();

        let loaded = doc.load().unwrap();
        assert!(!loaded.contains_key("a"));
        assert!(loaded.contains_key("b"));
        assert!(!temp.path().join("doc.json.tmp").exists());
    }

    #[test]
    fn test_load_malformed_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.json");
        fs::write(&path, "not json").unwrap();

        let doc: Document<Doc> = Document::open(&path).unwrap();
        assert!(matches!(doc.load(), Err(StoreError::Storage { .. })));
    }

    #[test]
    fn test_load_missing_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("doc.json");
        let doc: Document<Doc> = Document::open(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(matches!(doc.load(), Err(StoreError::Storage { .. })));
    }
}
