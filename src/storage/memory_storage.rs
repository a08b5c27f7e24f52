use crate::models::Record;
use crate::storage::{Snapshot, Storage, StoreError};
use std::sync::{Mutex, PoisonError};

/// Volatile storage for exercising the store without touching disk.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<Snapshot>
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            state: Mutex::new(Snapshot::new(records, 0))
        }
    }
}

impl Storage for MemoryStorage {
    fn load_records(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.state.lock().unwrap_or_else(PoisonError::into_inner).records.clone())
    }

    fn load_high_water(&self) -> Result<u64, StoreError> {
        Ok(self.state.lock().unwrap_or_else(PoisonError::into_inner).high_water)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        Ok(())
    }
}
