//! Prelude module - commonly used types for convenient import.
//!
//! Use `use permflow_manifest::prelude::*;` to import all essential types.

// Errors
pub use crate::{ComplianceError, ComplianceResult};

// Manifest data
pub use crate::{DeclaredCapability, DeclaredCapabilityIndex, ManifestInfo};

// Checks
pub use crate::ManifestComplianceChecker;
