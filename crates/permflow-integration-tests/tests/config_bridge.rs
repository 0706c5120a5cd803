//! Loaded configuration drives runtime settings and logging.

use std::time::Duration;

use permflow_config::Config;
use permflow_core::{OsVersion, names};
use permflow_runtime::{CycleState, PermissionRequester, RuntimeSettings};
use permflow_telemetry::{LogConfig, LogFormat};
use permflow_test::{MockHost, MockOracle, test_registry};

#[test]
fn test_user_file_flows_into_runtime_settings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[timing]\nsettle_delay_ms = 250\nmax_result_wait_ms = 500\n\n[logging]\nlevel = \"debug\"\nformat = \"json\"\ndirectives = [\"permflow_runtime=trace\"]\n",
    )
    .unwrap();

    let config = Config::load_with_home(dir.path()).unwrap();
    let settings = RuntimeSettings::from(&config);
    assert!(settings.compliance_enabled);
    assert_eq!(settings.settle_delay, Duration::from_millis(250));
    assert_eq!(settings.max_result_wait, Duration::from_millis(500));
    assert_eq!(settings.max_request_interval, Duration::from_secs(2));

    let log = LogConfig::from(&config.logging);
    assert_eq!(log.level, "debug");
    assert_eq!(log.format, LogFormat::Json);
    assert_eq!(log.directives, vec!["permflow_runtime=trace"]);
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[timing]\nmax_request_interval_ms = 0\n",
    )
    .unwrap();

    assert!(Config::load_with_home(dir.path()).is_err());
}

#[tokio::test(start_paused = true)]
async fn test_configured_settle_delay_paces_the_cycle() {
    let config = Config::from_toml_str("[timing]\nsettle_delay_ms = 3000\n").unwrap();
    let oracle = MockOracle::new();
    let requester = PermissionRequester::new(
        test_registry(OsVersion::ANDROID_13),
        std::sync::Arc::new(oracle.clone()),
        RuntimeSettings::from(&config),
    );
    let host = MockHost::new("host-1", &oracle);

    let started = tokio::time::Instant::now();
    let handle = requester
        .request([names::CAMERA], host.shared(), |_| {})
        .unwrap();

    assert_eq!(handle.wait_terminal().await, CycleState::Delivered);
    assert!(started.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_configured_compliance_switch() {
    let config = Config::from_toml_str("[compliance]\nenabled = false\n").unwrap();
    let oracle = MockOracle::new();
    let requester = PermissionRequester::new(
        test_registry(OsVersion::ANDROID_13),
        std::sync::Arc::new(oracle.clone()),
        RuntimeSettings::from(&config),
    )
    .with_manifest(permflow_manifest::ManifestInfo::new(
        OsVersion::ANDROID_6,
        OsVersion::ANDROID_13,
    ));
    let host = MockHost::new("host-1", &oracle);

    let handle = requester
        .request([names::CAMERA], host.shared(), |_| {})
        .unwrap();
    assert_eq!(handle.wait_terminal().await, CycleState::Delivered);
}
