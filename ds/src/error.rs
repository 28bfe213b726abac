//! Error types for store operations

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from the config and checklist stores
///
/// None of these leave a partially applied change behind: a failed operation
/// never reaches the write step, and writes replace the document atomically.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document missing, unreadable, malformed, or the write failed
    #[error("Storage error at {path}: {message}")]
    Storage { path: PathBuf, message: String },

    /// Another process holds the data directory
    #[error("Data directory is locked by another process: {path}")]
    Locked { path: PathBuf },

    /// Caller-supplied position out of range or empty description
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No checklist exists for this user yet
    #[error("No checklist for user {0}")]
    UserNotFound(String),

    /// The user's checklist has no entry at this 1-based position
    #[error("No task {position} in checklist of user {user_id}")]
    SlotNotFound { user_id: String, position: usize },
}

impl StoreError {
    pub(crate) fn storage(path: &Path, message: impl std::fmt::Display) -> Self {
        Self::Storage {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// True for the user and slot lookup failures
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::SlotNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::storage(Path::new("/tmp/config.json"), "expected value at line 1");
        assert!(err.to_string().contains("/tmp/config.json"));
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(StoreError::UserNotFound("42".to_string()).is_not_found());
        assert!(
            StoreError::SlotNotFound {
                user_id: "42".to_string(),
                position: 3
            }
            .is_not_found()
        );
        assert!(!StoreError::InvalidArgument("x".to_string()).is_not_found());
    }
}
