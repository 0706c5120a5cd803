//! Manifest compliance checks.
//!
//! Run on the normalized request set, so the names checked are the ones the
//! OS will actually see: a retired capability is validated through its
//! legacy equivalent, never under its original name.

use permflow_core::{Capability, CapabilityRegistry, RequestSet};
use tracing::debug;

use crate::error::{ComplianceError, ComplianceResult};
use crate::index::ManifestInfo;

/// Validates requests against the declared manifest.
#[derive(Debug, Clone, Copy)]
pub struct ManifestComplianceChecker<'a> {
    registry: &'a CapabilityRegistry,
    manifest: &'a ManifestInfo,
    enabled: bool,
}

impl<'a> ManifestComplianceChecker<'a> {
    /// Creates an enabled checker.
    #[must_use]
    pub fn new(registry: &'a CapabilityRegistry, manifest: &'a ManifestInfo) -> Self {
        Self {
            registry,
            manifest,
            enabled: true,
        }
    }

    /// Enables or disables the checker. A disabled checker accepts anything.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether checks run.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Validates a normalized request set.
    ///
    /// # Errors
    ///
    /// Returns the first [`ComplianceError`] found, in request order.
    pub fn validate(&self, normalized: &RequestSet) -> ComplianceResult<()> {
        if !self.enabled {
            return Ok(());
        }
        if normalized.is_empty() {
            return Err(ComplianceError::EmptyRequest);
        }
        for name in normalized {
            let Some(capability) = self.registry.get(name.as_str()) else {
                debug!(capability = %name, "Skipping compliance check for unregistered capability");
                continue;
            };
            self.check_capability(capability)?;
        }
        Ok(())
    }

    fn check_capability(&self, capability: &Capability) -> ComplianceResult<()> {
        let rule = capability.manifest_rule();
        if !rule.declaration_required {
            return Ok(());
        }

        let name = capability.name().as_str();
        let Some(declared) = self.manifest.declared.get(name) else {
            return Err(ComplianceError::MissingDeclaration {
                capability: name.to_string(),
            });
        };

        if let (Some(required), Some(max)) = (rule.min_max_version, declared.max_version)
            && max < required
        {
            return Err(ComplianceError::MaxVersionTooLow {
                capability: name.to_string(),
                declared: max,
                required,
            });
        }

        if self.manifest.target_version < capability.min_target_version() {
            return Err(ComplianceError::TargetVersionTooLow {
                capability: name.to_string(),
                target: self.manifest.target_version,
                required: capability.min_target_version(),
            });
        }

        self.check_legacy_declared(capability)
    }

    /// An app installable below the capability's introduction version falls
    /// back to the legacy equivalents there, so they must be declared too.
    fn check_legacy_declared(&self, capability: &Capability) -> ComplianceResult<()> {
        if self.manifest.min_version >= capability.introduced() {
            return Ok(());
        }
        for legacy in capability.legacy_equivalents() {
            let needs_declaration = self
                .registry
                .get(legacy.as_str())
                .is_some_and(|c| c.manifest_rule().declaration_required);
            if needs_declaration && !self.manifest.declared.contains(legacy.as_str()) {
                return Err(ComplianceError::MissingLegacyDeclaration {
                    capability: capability.name().to_string(),
                    legacy: legacy.to_string(),
                    introduced: capability.introduced(),
                });
            }
        }
        Ok(())
    }
}
