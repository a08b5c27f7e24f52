use crate::models::{Record, RecordDraft, RecordField};
use crate::storage::{Storage, StoreError};
use crate::types::{RecordId, Status};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Everything the backing storage persists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub records: Vec<Record>,
    /// Highest numeric id ever handed out, kept so deleted ids are not reissued.
    pub high_water: u64
}

impl Snapshot {
    /// Raises `high_water` to cover every stored id, so allocation never has
    /// to rescan the collection.
    pub fn new(records: Vec<Record>, high_water: u64) -> Self {
        let high_water = high_water.max(max_numeric_id(&records));

        Self { records, high_water }
    }

    /// Id the next appended record will receive: `"1"` for an empty store,
    /// otherwise one past the largest id ever assigned. Ids that are not
    /// plain decimal digits are ignored.
    pub fn next_id(&self) -> RecordId {
        (self.high_water + 1).to_string()
    }

    pub fn push(&mut self, record: Record) {
        if let Some(value) = numeric_id(&record.id) {
            self.high_water = self.high_water.max(value);
        }

        self.records.push(record);
    }

    /// Drops every record and restarts id allocation at `"1"`.
    pub fn clear(&mut self) {
        *self = Snapshot::default();
    }
}

fn numeric_id(id: &str) -> Option<u64> {
    if id.is_empty() || !id.chars().all(|character| character.is_ascii_digit()) {
        return None;
    }

    id.parse().ok()
}

fn max_numeric_id(records: &[Record]) -> u64 {
    records.iter()
        .filter_map(|record| numeric_id(&record.id))
        .max()
        .unwrap_or(0)
}

/// The single owner of the persisted record collection.
///
/// Reads load the whole collection and scan it linearly. Writes run
/// load → mutate → save while holding one process-wide lock, so concurrent
/// dialogs cannot lose each other's updates. The lock is synchronous and is
/// never held across an `.await`.
pub struct RecordStore<S: Storage> {
    storage: S,
    write_lock: Mutex<()>
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(())
        }
    }

    /// Loads every record. A corrupt collection is logged and treated as empty.
    pub fn load(&self) -> Result<Vec<Record>, StoreError> {
        match self.storage.load_records() {
            Ok(records) => Ok(records),
            Err(error @ StoreError::Corrupt { .. }) => {
                warn!("{error}; continuing with an empty collection, previous records are lost");
                Ok(Vec::new())
            }
            Err(error) => Err(error)
        }
    }

    /// Runs `change` against a freshly loaded snapshot and persists the result.
    ///
    /// Nothing is written when `change` fails.
    pub fn mutate<R>(&self, change: impl FnOnce(&mut Snapshot) -> Result<R, StoreError>) -> Result<R, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut snapshot = Snapshot::new(self.load()?, self.storage.load_high_water()?);

        let result = change(&mut snapshot)?;
        self.storage.save(&snapshot)?;

        Ok(result)
    }

    pub fn find_by_id(&self, record_id: &str) -> Result<Option<Record>, StoreError> {
        Ok(self.load()?.into_iter().find(|record| record.id == record_id))
    }

    pub fn filter_by_field_substring(&self, field: RecordField, term: &str) -> Result<Vec<Record>, StoreError> {
        let term = term.to_lowercase();
        Ok(self.load()?.into_iter().filter(|record| record.field_contains(field, &term)).collect())
    }

    pub fn filter_by_any_field_substring(&self, term: &str) -> Result<Vec<Record>, StoreError> {
        let term = term.to_lowercase();
        Ok(self.load()?.into_iter().filter(|record| record.any_field_contains(&term)).collect())
    }

    pub fn filter_by_status(&self, status: Status) -> Result<Vec<Record>, StoreError> {
        Ok(self.load()?.into_iter().filter(|record| record.status == status).collect())
    }

    /// Assigns the next id to `draft` and appends it.
    pub fn add(&self, draft: RecordDraft) -> Result<Record, StoreError> {
        let record = self.mutate(|snapshot| {
            let record = draft.into_record(snapshot.next_id())?;
            snapshot.push(record.clone());
            Ok(record)
        })?;

        debug!("Record [{}] added", record.id);

        Ok(record)
    }

    /// Removes a record, returning it if it existed.
    pub fn delete_by_id(&self, record_id: &str) -> Result<Option<Record>, StoreError> {
        self.mutate(|snapshot| {
            let position = snapshot.records.iter().position(|record| record.id == record_id);
            Ok(position.map(|index| snapshot.records.remove(index)))
        })
    }

    /// Sets a record's status, with funds when the status requires them.
    ///
    /// # Errors
    /// `StoreError::NotFound` for an unknown id, `StoreError::Record` when the
    /// funds rule is violated.
    pub fn update_status(&self, record_id: &str, status: Status, funds: Option<String>) -> Result<Record, StoreError> {
        self.mutate(|snapshot| {
            let record = snapshot.records.iter_mut()
                .find(|record| record.id == record_id)
                .ok_or_else(|| StoreError::not_found(record_id))?;

            record.apply_status(status, funds)?;

            Ok(record.clone())
        })
    }
}
