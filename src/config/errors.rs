use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No bot token available: [BOT_TOKEN] is set but blank")]
    MissingToken,
    #[error("Invalid value [{value}] for [{key}]: expected a positive whole number")]
    InvalidNumber {
        key: &'static str,
        value: String
    }
}

impl ConfigError {
    pub fn invalid_number(key: &'static str, value: &str) -> Self {
        Self::InvalidNumber { key, value: value.to_string() }
    }
}
