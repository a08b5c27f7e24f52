mod errors;
#[cfg(test)]
mod tests;

pub use errors::ConfigError;

use crate::engine::{DEFAULT_ACTOR_CAPACITY, DEFAULT_IDLE_TIMEOUT};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const TOKEN_VAR: &str = "BOT_TOKEN";
pub const DATA_FILE_VAR: &str = "LK_DATA_FILE";
pub const IDLE_SECS_VAR: &str = "LK_SESSION_IDLE_SECS";
pub const CAPACITY_VAR: &str = "LK_SESSION_CAPACITY";

pub const DEFAULT_DATA_FILE: &str = "lk_registry.json";

//NOTE: Only good for local console runs, deployments must set BOT_TOKEN
const BUILT_IN_TOKEN: &str = "0000000000:local-console-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub data_file: PathBuf,
    pub idle_timeout: Duration,
    pub actor_capacity: u64
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves every setting through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let idle_timeout = match parse_number(IDLE_SECS_VAR, lookup(IDLE_SECS_VAR))? {
            Some(seconds) => Duration::from_secs(seconds),
            None => DEFAULT_IDLE_TIMEOUT
        };

        Ok(Self {
            token: resolve_token(lookup(TOKEN_VAR))?,
            data_file: lookup(DATA_FILE_VAR)
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            idle_timeout,
            actor_capacity: parse_number(CAPACITY_VAR, lookup(CAPACITY_VAR))?.unwrap_or(DEFAULT_ACTOR_CAPACITY)
        })
    }

    /// The token with everything but its last four characters hidden.
    pub fn masked_token(&self) -> String {
        let visible: String = self.token.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
        format!("****{visible}")
    }
}

/// Picks the override when present, otherwise the built-in credential.
///
/// # Errors
/// `ConfigError::MissingToken` when the resolved value is blank.
pub fn resolve_token(override_token: Option<String>) -> Result<String, ConfigError> {
    let token = match override_token {
        Some(token) => token,
        None => {
            warn!("[{TOKEN_VAR}] is not set, falling back to the built-in token");
            BUILT_IN_TOKEN.to_string()
        }
    };

    let token = token.trim();

    if token.is_empty() {
        return Err(ConfigError::MissingToken);
    }

    Ok(token.to_string())
}

fn parse_number(key: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };

    match value.trim().parse::<u64>() {
        Ok(number) if number > 0 => Ok(Some(number)),
        _ => Err(ConfigError::invalid_number(key, &value))
    }
}
