use crate::storage::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Could not read import file [{path}]: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error
    },
    #[error("Malformed tabular import: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Store(#[from] StoreError)
}
