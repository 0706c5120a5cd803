//! Environment variable fallbacks.
//!
//! Env vars are a **fallback**, not an override: they only fill fields that
//! no config file set.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Prefix shared by every recognized variable.
pub const ENV_PREFIX: &str = "PERMFLOW_";

#[derive(Clone, Copy)]
enum Kind {
    Bool,
    Integer,
    String,
}

struct EnvMapping {
    var_name: &'static str,
    section: &'static str,
    key: &'static str,
    kind: Kind,
}

impl EnvMapping {
    fn field_path(&self) -> String {
        format!("{}.{}", self.section, self.key)
    }
}

const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "PERMFLOW_COMPLIANCE_ENABLED",
        section: "compliance",
        key: "enabled",
        kind: Kind::Bool,
    },
    EnvMapping {
        var_name: "PERMFLOW_SETTLE_DELAY_MS",
        section: "timing",
        key: "settle_delay_ms",
        kind: Kind::Integer,
    },
    EnvMapping {
        var_name: "PERMFLOW_LOG_LEVEL",
        section: "logging",
        key: "level",
        kind: Kind::String,
    },
    EnvMapping {
        var_name: "PERMFLOW_LOG_FORMAT",
        section: "logging",
        key: "format",
        kind: Kind::String,
    },
];

/// Snapshot of `PERMFLOW_*` variables from the process environment.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with(ENV_PREFIX))
        .collect()
}

/// Applies env fallbacks to `merged` for fields not in `file_set`.
///
/// Returns the number of variables applied.
///
/// # Errors
///
/// Returns [`ConfigError::EnvError`] if a variable cannot be coerced to its
/// field's type.
pub fn apply_env_fallbacks<S: std::hash::BuildHasher>(
    merged: &mut toml::Value,
    file_set: &HashSet<String>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<usize> {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        let path = mapping.field_path();
        if file_set.contains(&path) {
            continue;
        }
        let Some(raw) = env_vars.get(mapping.var_name) else {
            continue;
        };

        let value = coerce(mapping, raw)?;
        debug!(var = mapping.var_name, field = %path, "applying env var fallback");

        let Some(root) = merged.as_table_mut() else {
            continue;
        };
        let section = root
            .entry(mapping.section)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
        if let Some(table) = section.as_table_mut() {
            table.insert(mapping.key.to_owned(), value);
            count = count.saturating_add(1);
        }
    }

    Ok(count)
}

fn coerce(mapping: &EnvMapping, raw: &str) -> ConfigResult<toml::Value> {
    let trimmed = raw.trim();
    match mapping.kind {
        Kind::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(toml::Value::Boolean(true)),
            "0" | "false" | "no" | "off" => Ok(toml::Value::Boolean(false)),
            _ => Err(ConfigError::EnvError {
                var_name: mapping.var_name.to_owned(),
                message: format!("expected a boolean, got '{raw}'"),
            }),
        },
        Kind::Integer => trimmed
            .parse::<i64>()
            .ok()
            .filter(|v| *v >= 0)
            .map(toml::Value::Integer)
            .ok_or_else(|| ConfigError::EnvError {
                var_name: mapping.var_name.to_owned(),
                message: format!("expected a non-negative integer, got '{raw}'"),
            }),
        Kind::String => Ok(toml::Value::String(trimmed.to_owned())),
    }
}
