use crate::normalize::{lookup_status, DEFAULT_STATUS};
use crate::types::StatusError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::warn;

/// Lifecycle status of a tracked account.
///
/// The variant order is the display order used by every status keyboard, so
/// button payloads carry an index into [`Status::ALL`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Status {
    #[serde(rename = "NEW-white")]
    NewWhite,
    #[serde(rename = "NEW-not white")]
    NewNotWhite,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "resting")]
    Resting,
    #[serde(rename = "departed")]
    Departed,
    #[serde(rename = "blocked")]
    Blocked
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::NewWhite,
        Status::NewNotWhite,
        Status::InProgress,
        Status::Resting,
        Status::Departed,
        Status::Blocked
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Status::NewWhite => "NEW-white",
            Status::NewNotWhite => "NEW-not white",
            Status::InProgress => "in-progress",
            Status::Resting => "resting",
            Status::Departed => "departed",
            Status::Blocked => "blocked"
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Status::NewWhite => "🆕⚪",
            Status::NewNotWhite => "🆕⚫",
            Status::InProgress => "⚙️",
            Status::Resting => "🏖️",
            Status::Departed => "✈️",
            Status::Blocked => "🚫"
        }
    }

    /// Whether a record in this status must carry `remaining_funds`.
    pub fn requires_funds(&self) -> bool {
        matches!(self, Status::Departed | Status::Blocked)
    }

    pub fn index(&self) -> usize {
        Status::ALL.iter().position(|status| status == self).unwrap_or_default()
    }

    pub fn from_index(index: usize) -> Result<Self, StatusError> {
        Status::ALL.get(index).copied().ok_or(StatusError::IndexOutOfRange(index))
    }
}

impl Display for Status {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = StatusError;

    /// Parses a canonical label, ignoring case and surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        Status::ALL.iter()
            .find(|status| status.label().eq_ignore_ascii_case(value))
            .copied()
            .ok_or_else(|| StatusError::Unknown(value.to_string()))
    }
}

impl From<String> for Status {
    //NOTE: Stored files may predate the canonical labels, so synonyms are accepted on load and
    //      anything else falls back to the default rather than failing the whole collection
    fn from(value: String) -> Self {
        lookup_status(&value).unwrap_or_else(|| {
            warn!("Unknown stored status '{value}', loading it as {DEFAULT_STATUS}");
            DEFAULT_STATUS
        })
    }
}
