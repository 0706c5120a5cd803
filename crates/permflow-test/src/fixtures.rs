//! Test fixtures for common types.

use std::sync::Arc;

use permflow_core::{CapabilityRegistry, Catalog, OsVersion};
use permflow_manifest::ManifestInfo;
use permflow_runtime::{PermissionRequester, RuntimeSettings};

use crate::mocks::MockOracle;

/// The built-in catalog resolved for `os`.
///
/// # Panics
///
/// Panics if the built-in catalog is inconsistent.
#[must_use]
pub fn test_registry(os: OsVersion) -> Arc<CapabilityRegistry> {
    Arc::new(
        Catalog::builtin()
            .resolve(os)
            .expect("built-in catalog resolves"),
    )
}

/// A manifest declaring every capability in `registry`.
#[must_use]
pub fn declared_all(
    registry: &CapabilityRegistry,
    min_version: OsVersion,
    target_version: OsVersion,
) -> ManifestInfo {
    ManifestInfo::new(min_version, target_version)
        .declare_all(registry.iter().map(|capability| capability.name().clone()))
}

/// A requester over the built-in catalog for `os`, querying `oracle`, with
/// a manifest that declares everything.
#[must_use]
pub fn test_requester(os: OsVersion, oracle: &MockOracle) -> PermissionRequester {
    let registry = test_registry(os);
    let manifest = declared_all(&registry, OsVersion::ANDROID_6, OsVersion::ANDROID_15);
    PermissionRequester::new(registry, Arc::new(oracle.clone()), RuntimeSettings::default())
        .with_manifest(manifest)
}

/// Installs a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
