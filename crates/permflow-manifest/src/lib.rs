//! Permflow Manifest - Declared capabilities and compliance checks.
//!
//! This crate consumes the output of an external manifest reader
//! ([`ManifestInfo`]) and validates request sets against it before anything
//! is dispatched. Violations are [`ComplianceError`]s: build-time
//! misconfigurations that abort the request synchronously.
//!
//! # Example
//!
//! ```
//! use permflow_core::{Catalog, OsVersion, RequestSet, names};
//! use permflow_manifest::{ComplianceError, ManifestComplianceChecker, ManifestInfo};
//!
//! let registry = Catalog::builtin().resolve(OsVersion::ANDROID_13).unwrap();
//! let manifest = ManifestInfo::new(OsVersion::ANDROID_6, OsVersion::ANDROID_13);
//!
//! let err = ManifestComplianceChecker::new(&registry, &manifest)
//!     .validate(&RequestSet::from_iter([names::CAMERA]))
//!     .unwrap_err();
//! assert!(matches!(err, ComplianceError::MissingDeclaration { .. }));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod compliance;
/// Compliance error types.
pub mod error;
pub mod index;

pub use compliance::ManifestComplianceChecker;
pub use error::{ComplianceError, ComplianceResult};
pub use index::{DeclaredCapability, DeclaredCapabilityIndex, ManifestInfo, NEVER_FOR_LOCATION};
