mod errors;
mod json_storage;
#[cfg(test)]
mod memory_storage;
mod record_store;
mod session_storage;

use crate::models::Record;

pub use errors::StoreError;
pub use json_storage::JsonFileStorage;
#[cfg(test)]
pub use memory_storage::MemoryStorage;
pub use record_store::{RecordStore, Snapshot};
pub use session_storage::SessionStorage;

/// Backing representation of the record collection.
///
/// Only [`RecordStore`] talks to a `Storage`; everything else goes through the
/// store so id allocation and the write lock cannot be bypassed.
pub trait Storage: Send + Sync + 'static {
    /// Returns an empty collection when nothing has been persisted yet.
    fn load_records(&self) -> Result<Vec<Record>, StoreError>;
    /// Highest id ever assigned, or 0.
    fn load_high_water(&self) -> Result<u64, StoreError>;
    /// Replaces the whole persisted state.
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}
