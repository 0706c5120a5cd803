#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Layered configuration for the permission requester.
//!
//! # Usage
//!
//! ```rust,no_run
//! use permflow_config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("settle delay: {:?}", config.timing.settle_delay());
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **User** (`<platform config dir>/config.toml`)
//! 2. **Environment variables** (`PERMFLOW_*`), fallback only
//! 3. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! This crate has no dependencies on other permflow crates. Conversion into
//! runtime settings happens in `permflow-runtime`.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use types::*;

impl Config {
    /// Load configuration from the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config file is malformed, an env var
    /// is invalid, or the final configuration fails validation.
    pub fn load() -> ConfigResult<Self> {
        loader::load(None)
    }

    /// Load configuration with an explicit config directory override.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with_home(home_dir: &std::path::Path) -> ConfigResult<Self> {
        loader::load(Some(home_dir))
    }

    /// Load configuration from a single file (no env layering).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the string is malformed or fails
    /// validation.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        loader::from_toml_str(content)
    }
}
