use crate::storage::StoreError;
use crate::transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DialogError {
    #[error("Record store failed: {0}")]
    Store(#[from] StoreError),
    #[error("Chat transport failed: {0}")]
    Transport(#[from] TransportError)
}
