//! Parsed manifest data.
//!
//! The manifest reader itself lives outside this crate. It hands over a
//! [`ManifestInfo`], usually deserialized from whatever intermediate format
//! the build emits:
//!
//! ```
//! use permflow_manifest::ManifestInfo;
//!
//! let manifest: ManifestInfo = serde_json::from_str(r#"{
//!     "min_version": 23,
//!     "target_version": 34,
//!     "declared": {
//!         "android.permission.CAMERA": {},
//!         "android.permission.WRITE_EXTERNAL_STORAGE": { "max_version": 28 }
//!     }
//! }"#).unwrap();
//!
//! assert!(manifest.declared.contains("android.permission.CAMERA"));
//! ```

use std::collections::{BTreeSet, HashMap};

use permflow_core::{CapabilityName, OsVersion};
use serde::{Deserialize, Serialize};

/// `usesPermissionFlags` value asserting the app never derives location.
pub const NEVER_FOR_LOCATION: &str = "neverForLocation";

/// One `<uses-permission>` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredCapability {
    /// `android:maxSdkVersion`, if set.
    #[serde(default)]
    pub max_version: Option<OsVersion>,
    /// `android:usesPermissionFlags` values.
    #[serde(default)]
    pub flags: BTreeSet<String>,
}

impl DeclaredCapability {
    /// Whether the entry carries `flag`.
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }
}

/// Declared capabilities keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclaredCapabilityIndex {
    entries: HashMap<CapabilityName, DeclaredCapability>,
}

impl DeclaredCapabilityIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, name: impl Into<CapabilityName>, entry: DeclaredCapability) {
        self.entries.insert(name.into(), entry);
    }

    /// Looks up an entry.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DeclaredCapability> {
        self.entries.get(name)
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of declared capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<CapabilityName>> FromIterator<N> for DeclaredCapabilityIndex {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|name| (name.into(), DeclaredCapability::default()))
                .collect(),
        }
    }
}

/// Everything the compliance checker needs from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestInfo {
    /// `minSdkVersion`.
    pub min_version: OsVersion,
    /// `targetSdkVersion`.
    pub target_version: OsVersion,
    /// `<uses-permission>` entries.
    #[serde(default)]
    pub declared: DeclaredCapabilityIndex,
}

impl ManifestInfo {
    /// A manifest with no declarations.
    #[must_use]
    pub fn new(min_version: OsVersion, target_version: OsVersion) -> Self {
        Self {
            min_version,
            target_version,
            declared: DeclaredCapabilityIndex::new(),
        }
    }

    /// Declares `name` without a max version.
    #[must_use]
    pub fn declare(mut self, name: impl Into<CapabilityName>) -> Self {
        self.declared.insert(name, DeclaredCapability::default());
        self
    }

    /// Declares `name` with `android:maxSdkVersion`.
    #[must_use]
    pub fn declare_with_max(mut self, name: impl Into<CapabilityName>, max: OsVersion) -> Self {
        self.declared.insert(
            name,
            DeclaredCapability {
                max_version: Some(max),
                flags: BTreeSet::new(),
            },
        );
        self
    }

    /// Declares every name in `names`.
    #[must_use]
    pub fn declare_all<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CapabilityName>,
    {
        for name in names {
            self.declared.insert(name, DeclaredCapability::default());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_toml() {
        let manifest: ManifestInfo = toml::from_str(
            r#"
            min_version = 21
            target_version = 33

            [declared."android.permission.BLUETOOTH_SCAN"]
            flags = ["neverForLocation"]

            [declared."android.permission.WRITE_EXTERNAL_STORAGE"]
            max_version = 28
            "#,
        )
        .unwrap();

        assert_eq!(manifest.min_version, OsVersion::ANDROID_5);
        assert_eq!(manifest.target_version, OsVersion::ANDROID_13);
        assert!(
            manifest
                .declared
                .get("android.permission.BLUETOOTH_SCAN")
                .unwrap()
                .has_flag(NEVER_FOR_LOCATION)
        );
        assert_eq!(
            manifest
                .declared
                .get("android.permission.WRITE_EXTERNAL_STORAGE")
                .unwrap()
                .max_version,
            Some(OsVersion::ANDROID_9)
        );
    }

    #[test]
    fn test_builder() {
        let manifest = ManifestInfo::new(OsVersion::ANDROID_6, OsVersion::ANDROID_14)
            .declare("a")
            .declare_with_max("b", OsVersion::ANDROID_9)
            .declare_all(["c", "d"]);
        assert_eq!(manifest.declared.len(), 4);
        assert_eq!(
            manifest.declared.get("b").unwrap().max_version,
            Some(OsVersion::ANDROID_9)
        );
        assert!(!manifest.declared.contains("e"));
    }

    #[test]
    fn test_index_from_iter() {
        let index = DeclaredCapabilityIndex::from_iter(["a", "b"]);
        assert!(index.contains("a"));
        assert!(index.get("b").unwrap().flags.is_empty());
    }
}
