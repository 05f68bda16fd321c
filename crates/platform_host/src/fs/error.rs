//! File-system error kinds.

use thiserror::Error;

use super::types::NodeKind;
use crate::storage::kv::StoreError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures reported by [`FileSystemService`](super::service::FileSystemService) operations.
pub enum FsError {
    /// The file system or its store has not been initialized.
    #[error("file system not initialized")]
    NotInitialized,
    /// The node (or its parent directory) does not exist.
    #[error("{path}: no such file or directory")]
    NotFound {
        /// Path that failed to resolve.
        path: String,
    },
    /// A node already occupies the path.
    #[error("{path}: {kind} already exists")]
    AlreadyExists {
        /// Occupied path.
        path: String,
        /// Kind of the node that was being created.
        kind: NodeKind,
    },
    /// The node exists but is of the wrong kind for the operation.
    #[error("{path}: expected a {expected}")]
    WrongKind {
        /// Offending path.
        path: String,
        /// Kind the operation required.
        expected: NodeKind,
    },
    /// The path is malformed or not allowed for the operation.
    #[error("{path:?}: invalid path: {reason}")]
    InvalidPath {
        /// Offending path.
        path: String,
        /// Human-readable violation.
        reason: &'static str,
    },
    /// The storage backend failed.
    #[error(transparent)]
    Backend(StoreError),
}

impl FsError {
    pub(crate) fn not_found(path: &str) -> Self {
        Self::NotFound {
            path: path.to_string(),
        }
    }

    pub(crate) fn invalid_path(path: &str, reason: &'static str) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason,
        }
    }

    pub(crate) fn wrong_kind(path: &str, expected: NodeKind) -> Self {
        Self::WrongKind {
            path: path.to_string(),
            expected,
        }
    }
}

impl From<StoreError> for FsError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotInitialized => Self::NotInitialized,
            other => Self::Backend(other),
        }
    }
}
