//! Prelude module - commonly used types for convenient import.
//!
//! Use `use permflow_core::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use permflow_core::prelude::*;
//!
//! let registry = Catalog::builtin().resolve(OsVersion::ANDROID_13).unwrap();
//! let set = RequestSet::from_iter([names::CAMERA]);
//! assert_eq!(CompatibilityResolver::new(&registry).normalize(&set), set);
//! ```

// Errors
pub use crate::{CoreError, CoreResult};

// Capability model
pub use crate::{
    Capability, CapabilityKind, CapabilityName, CapabilityRegistry, CapabilitySpec, Catalog,
    Channel, ManifestRule, SettingsTarget, names,
};

// Versions
pub use crate::{OsVersion, VersionRange, VersionTable};

// Request pipeline
pub use crate::{
    CompatibilityResolver, DispatchChannelRouter, DispatchPlan, DispatchStep, GrantCheck,
    GrantOracle, Outcome, RequestSet, ResultAggregator, best_settings_targets,
};
