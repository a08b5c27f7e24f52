use crate::models::RecordError;
use crate::types::RecordId;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error at [{path}]: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error
    },
    #[error("Store file [{path}] is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error
    },
    #[error("Store serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Record [{0}] was not found")]
    NotFound(RecordId),
    #[error(transparent)]
    Record(#[from] RecordError)
}

impl StoreError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    pub fn corrupt(path: &Path, source: serde_json::Error) -> Self {
        Self::Corrupt { path: path.to_path_buf(), source }
    }

    pub fn not_found(record_id: &str) -> Self {
        Self::NotFound(record_id.to_string())
    }
}
