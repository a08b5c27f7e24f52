use super::{resolve_token, Config, ConfigError, CAPACITY_VAR, DATA_FILE_VAR, IDLE_SECS_VAR, TOKEN_VAR};
use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let values: HashMap<String, String> = pairs.iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    move |key: &str| values.get(key).cloned()
}

#[test]
fn test_defaults_apply_when_nothing_is_set() -> Result<()> {
    let config = Config::from_lookup(lookup(&[]))?;

    assert!(!config.token.is_empty());
    assert_eq!(config.data_file, PathBuf::from("lk_registry.json"));
    assert_eq!(config.idle_timeout, Duration::from_secs(1800));
    assert_eq!(config.actor_capacity, 10_000);

    Ok(())
}

#[test]
fn test_environment_overrides_are_used() -> Result<()> {
    let config = Config::from_lookup(lookup(&[
        (TOKEN_VAR, " 12345:secret "),
        (DATA_FILE_VAR, "/var/lib/lk/store.json"),
        (IDLE_SECS_VAR, "60"),
        (CAPACITY_VAR, "32"),
    ]))?;

    assert_eq!(config.token, "12345:secret");
    assert_eq!(config.masked_token(), "****cret");
    assert_eq!(config.data_file, PathBuf::from("/var/lib/lk/store.json"));
    assert_eq!(config.idle_timeout, Duration::from_secs(60));
    assert_eq!(config.actor_capacity, 32);

    Ok(())
}

#[test]
fn test_blank_token_is_fatal() {
    assert_eq!(resolve_token(Some("   ".to_string())), Err(ConfigError::MissingToken));
    assert_eq!(Config::from_lookup(lookup(&[(TOKEN_VAR, "")])), Err(ConfigError::MissingToken));
}

#[test]
fn test_malformed_numbers_are_rejected() {
    let result = Config::from_lookup(lookup(&[(IDLE_SECS_VAR, "soon")]));
    assert_eq!(result, Err(ConfigError::invalid_number(IDLE_SECS_VAR, "soon")));

    let result = Config::from_lookup(lookup(&[(CAPACITY_VAR, "0")]));
    assert_eq!(result, Err(ConfigError::invalid_number(CAPACITY_VAR, "0")));
}
