use crate::types::{RecordId, Status};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Record [{record_id}] is missing a full name")]
    MissingName {
        record_id: RecordId
    },
    #[error("Record [{record_id}] is missing a status")]
    MissingStatus {
        record_id: RecordId
    },
    #[error("Record [{record_id}] with status [{status}] requires remaining funds")]
    FundsRequired {
        record_id: RecordId,
        status: Status
    }
}

impl RecordError {
    pub fn missing_name(record_id: &str) -> Self {
        Self::MissingName { record_id: record_id.to_string() }
    }

    pub fn missing_status(record_id: &str) -> Self {
        Self::MissingStatus { record_id: record_id.to_string() }
    }

    pub fn funds_required(record_id: &str, status: Status) -> Self {
        Self::FundsRequired { record_id: record_id.to_string(), status }
    }
}
