mod draft;
mod errors;
mod record;

pub use draft::RecordDraft;
pub use errors::RecordError;
pub use record::Record;

/// A searchable record column.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RecordField {
    Id,
    Bank,
    FullName,
    Phone,
    Card,
    Status,
    RemainingFunds
}
