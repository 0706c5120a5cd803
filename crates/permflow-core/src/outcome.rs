//! Final grant/deny classification.

use serde::{Deserialize, Serialize};

use crate::capability::CapabilityName;
use crate::grant::GrantCheck;
use crate::request_set::RequestSet;

/// Partitioned result of one request cycle.
///
/// `granted` and `denied` are disjoint and together cover exactly the
/// capabilities the caller asked for, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    granted: Vec<CapabilityName>,
    denied: Vec<CapabilityName>,
}

impl Outcome {
    /// An outcome in which every requested capability is granted.
    #[must_use]
    pub fn all_granted(requested: &RequestSet) -> Self {
        Self {
            granted: requested.as_slice().to_vec(),
            denied: Vec::new(),
        }
    }

    /// Granted capabilities.
    #[must_use]
    pub fn granted(&self) -> &[CapabilityName] {
        &self.granted
    }

    /// Denied capabilities.
    #[must_use]
    pub fn denied(&self) -> &[CapabilityName] {
        &self.denied
    }

    /// Whether nothing was denied.
    #[must_use]
    pub fn is_all_granted(&self) -> bool {
        self.denied.is_empty()
    }

    /// Whether `name` was granted.
    #[must_use]
    pub fn is_granted(&self, name: &str) -> bool {
        self.granted.iter().any(|n| n.as_str() == name)
    }

    /// Whether this outcome partitions exactly `requested`.
    #[must_use]
    pub fn covers(&self, requested: &RequestSet) -> bool {
        let total = self.granted.len().saturating_add(self.denied.len());
        total == requested.len()
            && requested.iter().all(|name| {
                let g = self.granted.contains(name);
                let d = self.denied.contains(name);
                g != d
            })
    }

    /// Splits into `(granted, denied)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<CapabilityName>, Vec<CapabilityName>) {
        (self.granted, self.denied)
    }
}

/// Classifies the caller's original request against current grant state.
///
/// Legacy substitutions and companions added during normalization are never
/// reported; callers reason about what they asked for.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAggregator;

impl ResultAggregator {
    /// Builds the outcome for `original`.
    #[must_use]
    pub fn classify(original: &RequestSet, check: &GrantCheck<'_>) -> Outcome {
        let mut outcome = Outcome::default();
        for name in original {
            if check.is_granted(name.as_str()) {
                outcome.granted.push(name.clone());
            } else {
                outcome.denied.push(name.clone());
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;
    use crate::catalog::{Catalog, names};
    use crate::grant::GrantOracle;
    use crate::version::OsVersion;

    struct FineOnly;

    impl GrantOracle for FineOnly {
        fn is_granted(&self, capability: &Capability) -> bool {
            capability.name().as_str() == names::ACCESS_FINE_LOCATION
        }

        fn should_show_rationale(&self, _capability: &Capability) -> bool {
            false
        }
    }

    #[test]
    fn test_classifies_original_names_only() {
        let registry = Catalog::builtin().resolve(OsVersion::ANDROID_12).unwrap();
        let check = GrantCheck::new(&registry, &FineOnly);
        let original = RequestSet::from_iter([names::ACCESS_BACKGROUND_LOCATION]);

        let outcome = ResultAggregator::classify(&original, &check);
        assert!(outcome.granted().is_empty());
        assert_eq!(
            outcome.denied(),
            &[CapabilityName::from(names::ACCESS_BACKGROUND_LOCATION)]
        );
        assert!(outcome.covers(&original));
    }

    #[test]
    fn test_legacy_substitution_reported_under_original_name() {
        let registry = Catalog::builtin().resolve(OsVersion::ANDROID_9).unwrap();
        let check = GrantCheck::new(&registry, &FineOnly);
        let original = RequestSet::from_iter([names::ACCESS_BACKGROUND_LOCATION, names::CAMERA]);

        let outcome = ResultAggregator::classify(&original, &check);
        assert!(outcome.is_granted(names::ACCESS_BACKGROUND_LOCATION));
        assert_eq!(outcome.denied(), &[CapabilityName::from(names::CAMERA)]);
        assert!(!outcome.is_all_granted());
        assert!(outcome.covers(&original));
    }

    #[test]
    fn test_covers_rejects_partial_or_overlapping() {
        let requested = RequestSet::from_iter(["a", "b"]);
        assert!(Outcome::all_granted(&requested).covers(&requested));

        let partial = Outcome::all_granted(&RequestSet::from_iter(["a"]));
        assert!(!partial.covers(&requested));

        let overlapping = Outcome {
            granted: vec!["a".into(), "b".into()],
            denied: vec!["a".into()],
        };
        assert!(!overlapping.covers(&requested));
    }

    #[test]
    fn test_serde_shape() {
        let outcome = Outcome::all_granted(&RequestSet::from_iter(["a"]));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["granted"][0], "a");
        assert!(json["denied"].as_array().unwrap().is_empty());
    }
}
