use crate::models::errors::RecordError;
use crate::models::Record;
use crate::normalize::{normalize_card, normalize_phone};
use crate::types::{RecordId, Status};

/// A record under construction, before the store has assigned it an id.
///
/// The Add dialog fills it one field at a time; bulk ingest fills it from a
/// parsed row in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub bank: String,
    pub full_name: String,
    pub phone: String,
    pub card: String,
    pub status: Option<Status>,
    pub remaining_funds: Option<String>
}

impl RecordDraft {
    /// Canonicalizes the phone and card fields in place.
    pub fn normalize(&mut self) {
        self.phone = normalize_phone(&self.phone);
        self.card = normalize_card(&self.card);
    }

    /// Assembles the final record under the given id.
    ///
    /// # Errors
    /// Returns `RecordError` if the name or status is missing, or a
    /// funds-requiring status has no funds.
    pub fn into_record(self, id: RecordId) -> Result<Record, RecordError> {
        let full_name = self.full_name.trim().to_string();

        if full_name.is_empty() {
            return Err(RecordError::missing_name(&id));
        }

        let Some(status) = self.status else {
            return Err(RecordError::missing_status(&id))
        };

        let mut record = Record {
            id,
            bank: self.bank.trim().to_string(),
            full_name,
            phone: self.phone,
            card: self.card,
            status: Status::InProgress,
            remaining_funds: None
        };

        record.apply_status(status, self.remaining_funds)?;

        Ok(record)
    }
}
