use crate::models::errors::RecordError;
use crate::models::RecordField;
use crate::types::{RecordId, Status};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single tracked account as it is persisted.
///
/// `remaining_funds` is present exactly when `status` requires it. Every
/// mutation goes through [`Record::apply_status`] so that pairing cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Decimal digits, unique within the store and never reassigned.
    pub id: RecordId,
    #[serde(default)]
    pub bank: String,
    pub full_name: String,
    /// Canonical `+996...` form or empty.
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub card: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_funds: Option<String>
}

impl Record {
    /// Sets a new status, keeping the funds field consistent with it.
    ///
    /// # Errors
    /// Returns `RecordError::FundsRequired` when the status needs funds and
    /// none (or only whitespace) were given. The record is left untouched.
    pub fn apply_status(&mut self, status: Status, funds: Option<String>) -> Result<(), RecordError> {
        if status.requires_funds() {
            let funds = funds
                .map(|funds| funds.trim().to_string())
                .filter(|funds| !funds.is_empty())
                .ok_or_else(|| RecordError::funds_required(&self.id, status))?;

            self.remaining_funds = Some(funds);
        } else {
            self.remaining_funds = None;
        }

        self.status = status;

        Ok(())
    }

    pub fn field(&self, field: RecordField) -> Cow<'_, str> {
        match field {
            RecordField::Id => Cow::Borrowed(&self.id),
            RecordField::Bank => Cow::Borrowed(&self.bank),
            RecordField::FullName => Cow::Borrowed(&self.full_name),
            RecordField::Phone => Cow::Borrowed(&self.phone),
            RecordField::Card => Cow::Borrowed(&self.card),
            RecordField::Status => Cow::Borrowed(self.status.label()),
            RecordField::RemainingFunds => Cow::Borrowed(self.remaining_funds.as_deref().unwrap_or_default())
        }
    }

    /// Case-insensitive substring test against one field. `term` must already be lowercase.
    pub fn field_contains(&self, field: RecordField, term: &str) -> bool {
        self.field(field).to_lowercase().contains(term)
    }

    /// Case-insensitive substring test against every present field. `term` must already be lowercase.
    pub fn any_field_contains(&self, term: &str) -> bool {
        let mut fields = vec![
            RecordField::Id,
            RecordField::Bank,
            RecordField::FullName,
            RecordField::Phone,
            RecordField::Card,
            RecordField::Status
        ];

        if self.remaining_funds.is_some() {
            fields.push(RecordField::RemainingFunds);
        }

        fields.into_iter().any(|field| self.field_contains(field, term))
    }
}
