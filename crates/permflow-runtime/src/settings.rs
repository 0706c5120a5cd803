use std::time::Duration;

use permflow_config::Config;

/// Runtime policy shared by every cycle a requester starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeSettings {
    /// Run manifest compliance checks before dispatch.
    pub compliance_enabled: bool,
    /// Delay between the last step and classification.
    pub settle_delay: Duration,
    /// Upper bound for a capability's inter-request interval.
    pub max_request_interval: Duration,
    /// Upper bound for a capability's result wait.
    pub max_result_wait: Duration,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            compliance_enabled: true,
            settle_delay: Duration::from_millis(100),
            max_request_interval: Duration::from_secs(2),
            max_result_wait: Duration::from_secs(2),
        }
    }
}

impl RuntimeSettings {
    /// Sets whether compliance checks run.
    #[must_use]
    pub fn with_compliance(mut self, enabled: bool) -> Self {
        self.compliance_enabled = enabled;
        self
    }

    /// Sets the settle delay.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

impl From<&Config> for RuntimeSettings {
    fn from(config: &Config) -> Self {
        Self {
            compliance_enabled: config.compliance.enabled,
            settle_delay: config.timing.settle_delay(),
            max_request_interval: config.timing.max_request_interval(),
            max_result_wait: config.timing.max_result_wait(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_default_config() {
        assert_eq!(RuntimeSettings::from(&Config::default()), RuntimeSettings::default());
    }

    #[test]
    fn test_from_config() {
        let config = Config::from_toml_str(
            "[compliance]\nenabled = false\n[timing]\nsettle_delay_ms = 5\nmax_result_wait_ms = 50\n",
        )
        .unwrap();
        let settings = RuntimeSettings::from(&config);
        assert!(!settings.compliance_enabled);
        assert_eq!(settings.settle_delay, Duration::from_millis(5));
        assert_eq!(settings.max_result_wait, Duration::from_millis(50));
        assert_eq!(settings.max_request_interval, Duration::from_secs(2));
    }
}
