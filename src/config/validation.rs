//! Configuration validation.

use super::{Config, ProviderKind};
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Maximum allowed retry count.
pub const MAX_RETRIES: u32 = 10;

/// Smallest allowed recent-list length.
pub const MIN_RECENT_LIMIT: usize = 1;

/// Largest allowed recent-list length.
pub const MAX_RECENT_LIMIT: usize = 100;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming the first offending variable:
/// - `BIND_ADDR` must not be empty
/// - `ANTHROPIC_API_KEY` must not be empty when the Anthropic provider is selected
/// - `REQUEST_TIMEOUT_MS` and `FETCH_TIMEOUT_MS` must be between 1000 and 300000
/// - `MAX_RETRIES` must be between 0 and 10
/// - `RECENT_LIMIT` must be between 1 and 100
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.bind_addr.trim().is_empty() {
        return Err(invalid("BIND_ADDR", "must not be empty".into()));
    }

    if config.provider == ProviderKind::Anthropic
        && config.api_key.as_ref().is_none_or(|key| key.is_blank())
    {
        return Err(invalid(
            "ANTHROPIC_API_KEY",
            "must not be empty when ANALYZER_PROVIDER=anthropic".into(),
        ));
    }

    check_timeout("REQUEST_TIMEOUT_MS", config.request_timeout_ms)?;
    check_timeout("FETCH_TIMEOUT_MS", config.fetch_timeout_ms)?;

    if config.max_retries > MAX_RETRIES {
        return Err(invalid(
            "MAX_RETRIES",
            format!("must be between 0 and {MAX_RETRIES}"),
        ));
    }

    if !(MIN_RECENT_LIMIT..=MAX_RECENT_LIMIT).contains(&config.recent_limit) {
        return Err(invalid(
            "RECENT_LIMIT",
            format!("must be between {MIN_RECENT_LIMIT} and {MAX_RECENT_LIMIT}"),
        ));
    }

    Ok(())
}

fn check_timeout(var: &str, value: u64) -> Result<(), ConfigError> {
    if (MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            var,
            format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        ))
    }
}

fn invalid(var: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.into(),
        reason,
    }
}
