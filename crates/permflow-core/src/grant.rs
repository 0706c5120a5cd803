//! Version-gated grant checks.

use tracing::trace;

use crate::capability::{Capability, CapabilityName};
use crate::registry::CapabilityRegistry;

/// Boolean view of the host's current grant state.
///
/// Implementations answer for a single capability on the running OS and
/// must be side-effect free. Version gating (legacy equivalents, foreground
/// companions) is applied by [`GrantCheck`], not by the oracle.
pub trait GrantOracle: Send + Sync {
    /// Whether the OS currently reports `capability` as granted.
    fn is_granted(&self, capability: &Capability) -> bool;

    /// Whether the OS would show a rationale for `capability`.
    fn should_show_rationale(&self, capability: &Capability) -> bool;
}

/// Grant queries with version gating applied.
///
/// - an unsupported capability is granted iff all its legacy equivalents are
///   (vacuously true without any)
/// - a background capability also needs at least one foreground companion
///   granted
/// - unregistered names are never granted
#[derive(Clone, Copy)]
pub struct GrantCheck<'a> {
    registry: &'a CapabilityRegistry,
    oracle: &'a dyn GrantOracle,
}

impl std::fmt::Debug for GrantCheck<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrantCheck")
            .field("os_version", &self.registry.os_version())
            .finish_non_exhaustive()
    }
}

impl<'a> GrantCheck<'a> {
    /// Creates a check over `registry` backed by `oracle`.
    #[must_use]
    pub fn new(registry: &'a CapabilityRegistry, oracle: &'a dyn GrantOracle) -> Self {
        Self { registry, oracle }
    }

    /// The registry queried.
    #[must_use]
    pub fn registry(&self) -> &'a CapabilityRegistry {
        self.registry
    }

    /// Whether `name` is granted.
    #[must_use]
    pub fn is_granted(&self, name: &str) -> bool {
        match self.registry.get(name) {
            Some(capability) => self.is_capability_granted(capability),
            None => {
                trace!(capability = %name, "Grant query for unregistered capability");
                false
            },
        }
    }

    /// Whether `capability` is granted.
    #[must_use]
    pub fn is_capability_granted(&self, capability: &Capability) -> bool {
        if !capability.is_supported() {
            return capability
                .legacy_equivalents()
                .iter()
                .all(|legacy| self.is_granted(legacy.as_str()));
        }
        if !self.oracle.is_granted(capability) {
            return false;
        }
        if capability.is_background() {
            return self.any_companion_granted(capability);
        }
        true
    }

    /// Whether at least one foreground companion of `capability` is granted.
    ///
    /// True for capabilities without companions.
    #[must_use]
    pub fn any_companion_granted(&self, capability: &Capability) -> bool {
        let companions = capability.foreground_companions();
        companions.is_empty()
            || companions
                .iter()
                .any(|companion| self.is_granted(companion.as_str()))
    }

    /// Whether every name is granted. An empty input is never granted.
    #[must_use]
    pub fn is_granted_all<'n, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'n CapabilityName>,
    {
        let mut any = false;
        for name in names {
            if !self.is_granted(name.as_str()) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Granted subset, in input order.
    #[must_use]
    pub fn granted<'n, I>(&self, names: I) -> Vec<CapabilityName>
    where
        I: IntoIterator<Item = &'n CapabilityName>,
    {
        names
            .into_iter()
            .filter(|name| self.is_granted(name.as_str()))
            .cloned()
            .collect()
    }

    /// Denied subset, in input order.
    #[must_use]
    pub fn denied<'n, I>(&self, names: I) -> Vec<CapabilityName>
    where
        I: IntoIterator<Item = &'n CapabilityName>,
    {
        names
            .into_iter()
            .filter(|name| !self.is_granted(name.as_str()))
            .cloned()
            .collect()
    }

    /// Whether the OS would show a rationale for `name`.
    ///
    /// Unsupported capabilities answer for their legacy equivalents.
    #[must_use]
    pub fn should_show_rationale(&self, name: &str) -> bool {
        let Some(capability) = self.registry.get(name) else {
            return false;
        };
        if capability.is_supported() {
            return self.oracle.should_show_rationale(capability);
        }
        capability
            .legacy_equivalents()
            .iter()
            .any(|legacy| self.should_show_rationale(legacy.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::catalog::{Catalog, names};
    use crate::version::OsVersion;

    struct Granted(HashSet<&'static str>);

    impl GrantOracle for Granted {
        fn is_granted(&self, capability: &Capability) -> bool {
            self.0.contains(capability.name().as_str())
        }

        fn should_show_rationale(&self, _capability: &Capability) -> bool {
            false
        }
    }

    fn oracle(granted: &[&'static str]) -> Granted {
        Granted(granted.iter().copied().collect())
    }

    fn names_of(list: &[&str]) -> Vec<CapabilityName> {
        list.iter().copied().map(CapabilityName::from).collect()
    }

    #[test]
    fn test_plain_capability_follows_oracle() {
        let registry = Catalog::builtin().resolve(OsVersion::ANDROID_13).unwrap();
        let oracle = oracle(&[names::CAMERA]);
        let check = GrantCheck::new(&registry, &oracle);

        assert!(check.is_granted(names::CAMERA));
        assert!(!check.is_granted(names::RECORD_AUDIO));
        assert!(!check.is_granted("not.registered"));
    }

    #[test]
    fn test_unsupported_capability_uses_legacy_equivalents() {
        let registry = Catalog::builtin().resolve(OsVersion::ANDROID_12).unwrap();

        let none = oracle(&[]);
        assert!(!GrantCheck::new(&registry, &none).is_granted(names::READ_MEDIA_IMAGES));

        let storage = oracle(&[names::READ_EXTERNAL_STORAGE]);
        assert!(GrantCheck::new(&registry, &storage).is_granted(names::READ_MEDIA_IMAGES));
    }

    #[test]
    fn test_unsupported_without_equivalents_is_granted() {
        let registry = Catalog::builtin().resolve(OsVersion::ANDROID_9).unwrap();
        let none = oracle(&[]);
        assert!(GrantCheck::new(&registry, &none).is_granted(names::ACCESS_MEDIA_LOCATION));
    }

    #[test]
    fn test_background_requires_foreground_companion() {
        let registry = Catalog::builtin().resolve(OsVersion::ANDROID_12).unwrap();

        let background_only = oracle(&[names::ACCESS_BACKGROUND_LOCATION]);
        let check = GrantCheck::new(&registry, &background_only);
        assert!(!check.is_granted(names::ACCESS_BACKGROUND_LOCATION));

        let with_coarse = oracle(&[names::ACCESS_BACKGROUND_LOCATION, names::ACCESS_COARSE_LOCATION]);
        let check = GrantCheck::new(&registry, &with_coarse);
        assert!(check.is_granted(names::ACCESS_BACKGROUND_LOCATION));
    }

    #[test]
    fn test_set_queries() {
        let registry = Catalog::builtin().resolve(OsVersion::ANDROID_13).unwrap();
        let oracle = oracle(&[names::CAMERA]);
        let check = GrantCheck::new(&registry, &oracle);

        let requested = names_of(&[names::CAMERA, names::RECORD_AUDIO]);
        assert!(!check.is_granted_all(&requested));
        assert!(check.is_granted_all(&names_of(&[names::CAMERA])));
        assert!(!check.is_granted_all(&Vec::new()));
        assert_eq!(check.granted(&requested), names_of(&[names::CAMERA]));
        assert_eq!(check.denied(&requested), names_of(&[names::RECORD_AUDIO]));
    }
}
