//! Resolved capability registry.

use std::collections::HashMap;

use crate::capability::{Capability, CapabilityName};
use crate::error::{CoreError, CoreResult};
use crate::version::OsVersion;

/// All capabilities resolved for one OS version.
///
/// Built once at startup by [`Catalog::resolve`](crate::Catalog::resolve) and
/// shared read-only afterwards. Construction guarantees that every legacy and
/// companion reference points to a registered capability and that the
/// reference graph is acyclic.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    os_version: OsVersion,
    capabilities: Vec<Capability>,
    index: HashMap<CapabilityName, usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl CapabilityRegistry {
    /// Builds a registry from already-resolved capabilities.
    ///
    /// Later duplicates replace earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SelfReference`], [`CoreError::DanglingReference`]
    /// or [`CoreError::ReferenceCycle`] if the reference graph is invalid.
    pub fn from_capabilities(
        os_version: OsVersion,
        capabilities: Vec<Capability>,
    ) -> CoreResult<Self> {
        let mut deduped: Vec<Capability> = Vec::with_capacity(capabilities.len());
        let mut index = HashMap::with_capacity(capabilities.len());
        for capability in capabilities {
            if let Some(&slot) = index.get(&capability.name) {
                deduped[slot] = capability;
            } else {
                index.insert(capability.name.clone(), deduped.len());
                deduped.push(capability);
            }
        }

        let registry = Self {
            os_version,
            capabilities: deduped,
            index,
        };
        registry.validate_references()?;
        Ok(registry)
    }

    fn references(capability: &Capability) -> impl Iterator<Item = &CapabilityName> {
        capability.legacy.iter().chain(capability.foreground.iter())
    }

    fn validate_references(&self) -> CoreResult<()> {
        for capability in &self.capabilities {
            for target in Self::references(capability) {
                if *target == capability.name {
                    return Err(CoreError::SelfReference {
                        name: capability.name.to_string(),
                    });
                }
                if !self.index.contains_key(target) {
                    return Err(CoreError::DanglingReference {
                        from: capability.name.to_string(),
                        to: target.to_string(),
                    });
                }
            }
        }

        let mut marks: HashMap<&CapabilityName, Mark> = HashMap::new();
        for capability in &self.capabilities {
            self.visit(&capability.name, &mut marks)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        name: &'a CapabilityName,
        marks: &mut HashMap<&'a CapabilityName, Mark>,
    ) -> CoreResult<()> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                return Err(CoreError::ReferenceCycle {
                    name: name.to_string(),
                });
            },
            None => {},
        }
        marks.insert(name, Mark::Visiting);
        if let Some(capability) = self.get(name.as_str()) {
            for target in Self::references(capability) {
                self.visit(target, marks)?;
            }
        }
        marks.insert(name, Mark::Done);
        Ok(())
    }

    /// OS version the registry was resolved for.
    #[must_use]
    pub fn os_version(&self) -> OsVersion {
        self.os_version
    }

    /// Looks up a capability.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.index.get(name).map(|&slot| &self.capabilities[slot])
    }

    /// Looks up a capability, failing if it is not registered.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCapability`] if `name` is not registered.
    pub fn require(&self, name: &str) -> CoreResult<&Capability> {
        self.get(name).ok_or_else(|| CoreError::UnknownCapability {
            name: name.to_string(),
        })
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of registered capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Iterates capabilities in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }
}
