use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("Status error: unknown status '{0}'")]
    Unknown(String),
    #[error("Status error: no status at index {0}")]
    IndexOutOfRange(usize)
}
