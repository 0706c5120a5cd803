//! Version compatibility normalization.
//!
//! [`CompatibilityResolver::normalize`] rewrites a caller's [`RequestSet`]
//! into the set that is actually dispatched on the running OS:
//!
//! 1. A capability newer than the OS is replaced by its legacy equivalents,
//!    recursively. Without equivalents it is dropped; the grant check treats
//!    it as granted.
//! 2. A background capability pulls in its foreground companions, which end
//!    up directly before it.
//! 3. Duplicates collapse with last-write-wins ordering.
//!
//! Normalization never fails. Names the registry does not know pass through
//! untouched so that the caller-facing layer can report them.

use std::collections::HashSet;

use tracing::trace;

use crate::capability::CapabilityName;
use crate::registry::CapabilityRegistry;
use crate::request_set::RequestSet;

/// Normalizes request sets against a resolved registry.
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityResolver<'a> {
    registry: &'a CapabilityRegistry,
}

impl<'a> CompatibilityResolver<'a> {
    /// Creates a resolver over `registry`.
    #[must_use]
    pub fn new(registry: &'a CapabilityRegistry) -> Self {
        Self { registry }
    }

    /// Expands a single name into the names dispatched in its place, in
    /// dispatch order.
    #[must_use]
    pub fn expand(&self, name: &str) -> Vec<CapabilityName> {
        let mut out = Vec::new();
        let mut visiting = HashSet::new();
        self.expand_into(name, &mut out, &mut visiting);
        out
    }

    fn expand_into<'n>(
        &'n self,
        name: &'n str,
        out: &mut Vec<CapabilityName>,
        visiting: &mut HashSet<&'n str>,
    ) {
        if !visiting.insert(name) {
            return;
        }
        match self.registry.get(name) {
            None => out.push(CapabilityName::from(name)),
            Some(capability) if !capability.is_supported() => {
                trace!(
                    capability = %name,
                    os = %self.registry.os_version(),
                    "Substituting legacy equivalents"
                );
                for legacy in capability.legacy_equivalents() {
                    self.expand_into(legacy.as_str(), out, visiting);
                }
            },
            Some(capability) => {
                for companion in capability.foreground_companions() {
                    self.expand_into(companion.as_str(), out, visiting);
                }
                out.push(capability.name().clone());
            },
        }
        visiting.remove(name);
    }

    /// Normalizes `requested` for the registry's OS version.
    #[must_use]
    pub fn normalize(&self, requested: &RequestSet) -> RequestSet {
        let mut normalized = RequestSet::new();
        for name in requested {
            normalized.extend(self.expand(name.as_str()));
        }

        // A later request may have moved a companion behind its background
        // capability. Pin companions back in front.
        let backgrounds: Vec<CapabilityName> = normalized
            .iter()
            .filter(|name| {
                self.registry
                    .get(name.as_str())
                    .is_some_and(|c| c.is_supported() && c.is_background())
            })
            .cloned()
            .collect();

        for background in &backgrounds {
            let Some(capability) = self.registry.get(background.as_str()) else {
                continue;
            };
            for companion in capability.foreground_companions() {
                for expanded in self.expand(companion.as_str()) {
                    normalized.insert_before(expanded, background.as_str());
                }
            }
        }

        normalized
    }
}
