//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Longest accepted settle delay (one minute).
const MAX_SETTLE_DELAY_MS: u64 = 60_000;

/// Longest accepted clamp for intervals and waits (one minute).
const MAX_CLAMP_MS: u64 = 60_000;

/// Validates a fully merged configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_timing(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_timing(config: &Config) -> ConfigResult<()> {
    let t = &config.timing;

    if t.settle_delay_ms > MAX_SETTLE_DELAY_MS {
        return Err(ConfigError::ValidationError {
            field: "timing.settle_delay_ms".to_owned(),
            message: format!("settle_delay_ms must not exceed {MAX_SETTLE_DELAY_MS}"),
        });
    }

    for (field, value) in [
        ("timing.max_request_interval_ms", t.max_request_interval_ms),
        ("timing.max_result_wait_ms", t.max_result_wait_ms),
    ] {
        if value == 0 || value > MAX_CLAMP_MS {
            return Err(ConfigError::ValidationError {
                field: field.to_owned(),
                message: format!("must be between 1 and {MAX_CLAMP_MS}"),
            });
        }
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if l.level.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: "level must not be empty".to_owned(),
        });
    }

    if !matches!(
        l.format.to_ascii_lowercase().as_str(),
        "pretty" | "compact" | "json" | "full"
    ) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported format '{}'; expected one of: pretty, compact, json, full",
                l.format
            ),
        });
    }

    Ok(())
}
