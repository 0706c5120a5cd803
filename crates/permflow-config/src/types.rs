use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Manifest compliance checks.
    pub compliance: ComplianceSection,
    /// Timing policy for request cycles.
    pub timing: TimingSection,
    /// Logging.
    pub logging: LoggingSection,
}

/// `[compliance]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceSection {
    /// Whether manifest declarations are validated before dispatch.
    pub enabled: bool,
}

impl Default for ComplianceSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// `[timing]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSection {
    /// Delay between the last step and classification, in milliseconds.
    pub settle_delay_ms: u64,
    /// Upper bound for per-capability request intervals, in milliseconds.
    pub max_request_interval_ms: u64,
    /// Upper bound for per-capability result waits, in milliseconds.
    pub max_result_wait_ms: u64,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            settle_delay_ms: 100,
            max_request_interval_ms: 2000,
            max_result_wait_ms: 2000,
        }
    }
}

impl TimingSection {
    /// [`settle_delay_ms`](Self::settle_delay_ms) as a duration.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// [`max_request_interval_ms`](Self::max_request_interval_ms) as a duration.
    #[must_use]
    pub fn max_request_interval(&self) -> Duration {
        Duration::from_millis(self.max_request_interval_ms)
    }

    /// [`max_result_wait_ms`](Self::max_result_wait_ms) as a duration.
    #[must_use]
    pub fn max_result_wait(&self) -> Duration {
        Duration::from_millis(self.max_result_wait_ms)
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Base filter level.
    pub level: String,
    /// One of `pretty`, `compact`, `json`, `full`.
    pub format: String,
    /// Extra filter directives.
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "pretty".to_owned(),
            directives: Vec::new(),
        }
    }
}
