//! Permflow Core - Capability model and request normalization.
//!
//! This crate provides the pure, host-independent half of the permission
//! request engine:
//!
//! - [`Capability`] descriptors resolved for one OS version from a
//!   [`Catalog`] of version-keyed [`CapabilitySpec`]s
//! - [`RequestSet`] with last-write-wins ordering
//! - [`CompatibilityResolver`] (legacy substitution, foreground companions)
//! - [`DispatchChannelRouter`] producing a [`DispatchPlan`]
//! - [`GrantCheck`] version gating over an external [`GrantOracle`]
//! - [`ResultAggregator`] producing the final [`Outcome`]
//!
//! Nothing in this crate performs I/O or talks to a host. The orchestration
//! state machine lives in `permflow-runtime`.
//!
//! # Example
//!
//! ```
//! use permflow_core::{
//!     CapabilityName, Catalog, CompatibilityResolver, OsVersion, RequestSet, names,
//! };
//!
//! let registry = Catalog::builtin().resolve(OsVersion::ANDROID_12).unwrap();
//! let requested = RequestSet::from_iter([names::ACCESS_BACKGROUND_LOCATION]);
//!
//! let normalized = CompatibilityResolver::new(&registry).normalize(&requested);
//! assert_eq!(
//!     normalized.as_slice(),
//!     &[
//!         CapabilityName::from(names::ACCESS_FINE_LOCATION),
//!         CapabilityName::from(names::ACCESS_COARSE_LOCATION),
//!         CapabilityName::from(names::ACCESS_BACKGROUND_LOCATION),
//!     ]
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod capability;
pub mod catalog;
pub mod compat;
/// Error types for capability resolution.
pub mod error;
pub mod grant;
pub mod outcome;
pub mod plan;
pub mod registry;
pub mod request_set;
pub mod settings;
pub mod version;

pub use capability::{
    Capability, CapabilityKind, CapabilityName, Channel, ManifestRule, SettingsTarget,
};
pub use catalog::{Catalog, CapabilitySpec, names};
pub use compat::CompatibilityResolver;
pub use error::{CoreError, CoreResult};
pub use grant::{GrantCheck, GrantOracle};
pub use outcome::{Outcome, ResultAggregator};
pub use plan::{DispatchChannelRouter, DispatchPlan, DispatchStep};
pub use registry::CapabilityRegistry;
pub use request_set::RequestSet;
pub use settings::best_settings_targets;
pub use version::{OsVersion, VersionRange, VersionTable};
