mod errors;
mod status;
#[cfg(test)]
mod tests;

pub use errors::StatusError;
pub use status::Status;

pub type RecordId = String;
pub type ChatId = i64;
pub type MessageId = i64;
