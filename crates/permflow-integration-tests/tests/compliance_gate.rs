//! Manifest compliance aborts requests before the host is touched.

use std::sync::Arc;

use permflow_core::{OsVersion, names};
use permflow_manifest::{ComplianceError, ManifestInfo};
use permflow_runtime::{CycleState, PermissionRequester, RuntimeError, RuntimeSettings};
use permflow_test::{MockHost, MockOracle, OutcomeCapture, test_registry};

fn requester(os: OsVersion, oracle: &MockOracle, manifest: ManifestInfo) -> PermissionRequester {
    PermissionRequester::new(
        test_registry(os),
        Arc::new(oracle.clone()),
        RuntimeSettings::default(),
    )
    .with_manifest(manifest)
}

#[tokio::test(start_paused = true)]
async fn test_undeclared_capability_fails_without_dispatch() {
    let oracle = MockOracle::new();
    let requester = requester(
        OsVersion::ANDROID_13,
        &oracle,
        ManifestInfo::new(OsVersion::ANDROID_6, OsVersion::ANDROID_13),
    );
    let host = MockHost::new("host-1", &oracle);
    let capture = OutcomeCapture::new();

    let err = requester
        .request([names::CAMERA], host.shared(), capture.callback())
        .unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::Compliance(ComplianceError::MissingDeclaration { .. })
    ));
    assert!(err.to_string().contains(names::CAMERA));
    assert!(host.calls().is_empty());
    assert_eq!(capture.count(), 0);
    assert!(!requester.is_busy("host-1"));
}

#[tokio::test(start_paused = true)]
async fn test_compliance_checks_the_dispatched_legacy_name() {
    // Declaring only the new name is not enough on a release that predates it.
    let oracle = MockOracle::new();
    let manifest = ManifestInfo::new(OsVersion::ANDROID_6, OsVersion::ANDROID_13)
        .declare(names::READ_MEDIA_IMAGES);
    let requester = requester(OsVersion::ANDROID_12, &oracle, manifest);
    let host = MockHost::new("host-1", &oracle);

    let err = requester
        .request([names::READ_MEDIA_IMAGES], host.shared(), |_| {})
        .unwrap_err();

    match err {
        RuntimeError::Compliance(ComplianceError::MissingDeclaration { capability }) => {
            assert_eq!(capability, names::READ_EXTERNAL_STORAGE);
        },
        other => panic!("unexpected error: {other}"),
    }
    assert!(host.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_legacy_declaration_for_low_min_version() {
    let oracle = MockOracle::new();
    let manifest = ManifestInfo::new(OsVersion::ANDROID_6, OsVersion::ANDROID_13)
        .declare(names::READ_MEDIA_IMAGES);
    let requester = requester(OsVersion::ANDROID_13, &oracle, manifest);
    let host = MockHost::new("host-1", &oracle);

    let err = requester
        .request([names::READ_MEDIA_IMAGES], host.shared(), |_| {})
        .unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::Compliance(ComplianceError::MissingLegacyDeclaration { .. })
    ));
    assert!(host.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_legacy_check_relaxed_when_min_version_is_new_enough() {
    let oracle = MockOracle::new();
    let manifest = ManifestInfo::new(OsVersion::ANDROID_13, OsVersion::ANDROID_13)
        .declare(names::READ_MEDIA_IMAGES);
    let requester = requester(OsVersion::ANDROID_13, &oracle, manifest);
    let host = MockHost::new("host-1", &oracle);

    let handle = requester
        .request([names::READ_MEDIA_IMAGES], host.shared(), |_| {})
        .unwrap();

    assert_eq!(handle.wait_terminal().await, CycleState::Delivered);
    assert_eq!(host.prompts().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_target_version_too_low_is_fatal() {
    let oracle = MockOracle::new();
    let manifest = ManifestInfo::new(OsVersion::ANDROID_6, OsVersion::ANDROID_12)
        .declare(names::POST_NOTIFICATIONS);
    let requester = requester(OsVersion::ANDROID_13, &oracle, manifest);
    let host = MockHost::new("host-1", &oracle);

    let err = requester
        .request([names::POST_NOTIFICATIONS], host.shared(), |_| {})
        .unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::Compliance(ComplianceError::TargetVersionTooLow { .. })
    ));
    assert!(host.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_disabled_compliance_dispatches_undeclared() {
    let oracle = MockOracle::new();
    let requester = PermissionRequester::new(
        test_registry(OsVersion::ANDROID_13),
        Arc::new(oracle.clone()),
        RuntimeSettings::default().with_compliance(false),
    )
    .with_manifest(ManifestInfo::new(OsVersion::ANDROID_6, OsVersion::ANDROID_13));
    let host = MockHost::new("host-1", &oracle);

    let handle = requester
        .request([names::CAMERA], host.shared(), |_| {})
        .unwrap();

    assert_eq!(handle.wait_terminal().await, CycleState::Delivered);
    assert_eq!(host.prompts().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_no_manifest_skips_compliance() {
    let oracle = MockOracle::new();
    let requester = PermissionRequester::new(
        test_registry(OsVersion::ANDROID_13),
        Arc::new(oracle.clone()),
        RuntimeSettings::default(),
    );
    let host = MockHost::new("host-1", &oracle);

    let handle = requester
        .request([names::CAMERA], host.shared(), |_| {})
        .unwrap();

    assert_eq!(handle.wait_terminal().await, CycleState::Delivered);
}
