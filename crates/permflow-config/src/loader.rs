//! Config file discovery and layered loading.
//!
//! `Config::load()`:
//! 1. Parse embedded `defaults.toml`
//! 2. Merge the user file (`<config dir>/config.toml`)
//! 3. Apply `PERMFLOW_*` env fallbacks for fields no file set
//! 4. Deserialize and validate

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum accepted config file size (1 MiB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Loads the layered configuration using the process environment.
///
/// `home_override` replaces the platform config directory; the user file is
/// then `<home_override>/config.toml`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a file is unreadable or malformed, an env
/// var is invalid, or the result fails validation.
pub fn load(home_override: Option<&Path>) -> ConfigResult<Config> {
    load_with_env(home_override, &collect_env_vars())
}

/// Like [`load`], with an explicit environment snapshot.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env<S: std::hash::BuildHasher>(
    home_override: Option<&Path>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<Config> {
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;
    let mut file_set = HashSet::new();

    let user_path = user_config_path(home_override)?;
    if let Some(overlay) = try_load_file(&user_path)? {
        merge_tracking(&mut merged, &overlay, "", &mut file_set);
        info!(path = %user_path.display(), "loaded user config");
    }

    let applied = apply_env_fallbacks(&mut merged, &file_set, env_vars)?;
    if applied > 0 {
        debug!(count = applied, "applied environment variable fallbacks");
    }

    let config: Config = merged
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: "<merged config>".to_owned(),
            source: e,
        })?;

    validate::validate(&config)?;
    Ok(config)
}

/// Loads a single file on top of the built-in defaults, without env
/// fallbacks.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is missing, too large, malformed,
/// or fails validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let metadata = std::fs::metadata(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    check_size(path, metadata.len())?;

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content, &path.display().to_string())
}

/// Parses a TOML string on top of the built-in defaults.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the string is malformed or fails validation.
pub fn from_toml_str(content: &str) -> ConfigResult<Config> {
    parse(content, "<string>")
}

fn parse(content: &str, origin: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: origin.to_owned(),
        source: e,
    })?;
    validate::validate(&config)?;
    Ok(config)
}

fn check_size(path: &Path, len: u64) -> ConfigResult<()> {
    if len > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {len} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit"
            ),
        });
    }
    Ok(())
}

/// Loads a file, returning `None` if it does not exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };
    check_size(path, content.len() as u64)?;

    let value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(Some(value))
}

fn user_config_path(home_override: Option<&Path>) -> ConfigResult<PathBuf> {
    if let Some(home) = home_override {
        return Ok(home.join("config.toml"));
    }
    directories::ProjectDirs::from("dev", "permflow", "permflow")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .ok_or(ConfigError::NoHomeDir)
}

/// Deep-merges `overlay` into `base`, recording every leaf path it sets.
fn merge_tracking(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    file_set: &mut HashSet<String>,
) {
    let (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) = (base, overlay)
    else {
        return;
    };
    for (key, value) in overlay_table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match base_table.get_mut(key) {
            Some(existing) if existing.is_table() && value.is_table() => {
                merge_tracking(existing, value, &path, file_set);
            },
            _ => {
                base_table.insert(key.clone(), value.clone());
                file_set.insert(path);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_defaults_match_struct_defaults() {
        let from_file: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(from_file, Config::default());
    }

    #[test]
    fn test_load_without_user_file() {
        let home = tempfile::tempdir().unwrap();
        let config = load_with_env(Some(home.path()), &no_env()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "[timing]\nsettle_delay_ms = 250\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = load_with_env(Some(home.path()), &no_env()).unwrap();
        assert_eq!(config.timing.settle_delay_ms, 250);
        assert_eq!(config.timing.max_result_wait_ms, 2000);
        assert_eq!(config.logging.format, "json");
        assert!(config.compliance.enabled);
    }

    #[test]
    fn test_env_is_fallback_only() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join("config.toml"), "[logging]\nlevel = \"warn\"\n").unwrap();

        let env: HashMap<String, String> = [
            ("PERMFLOW_LOG_LEVEL".to_owned(), "trace".to_owned()),
            ("PERMFLOW_COMPLIANCE_ENABLED".to_owned(), "false".to_owned()),
        ]
        .into_iter()
        .collect();

        let config = load_with_env(Some(home.path()), &env).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert!(!config.compliance.enabled);
    }

    #[test]
    fn test_malformed_user_file() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join("config.toml"), "[timing\n").unwrap();
        let err = load_with_env(Some(home.path()), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_invalid_merged_value_fails_validation() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "[timing]\nmax_request_interval_ms = 0\n",
        )
        .unwrap();
        let err = load_with_env(Some(home.path()), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_load_file_rejects_oversized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.toml");
        let padding = "#".repeat(usize::try_from(MAX_CONFIG_FILE_SIZE).unwrap() + 1);
        std::fs::write(&path, padding).unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("byte limit"));
    }

    #[test]
    fn test_load_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_from_toml_str_partial() {
        let config = from_toml_str("[compliance]\nenabled = false\n").unwrap();
        assert!(!config.compliance.enabled);
        assert_eq!(config.timing.settle_delay_ms, 100);
    }
}
