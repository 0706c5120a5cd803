//! OS versions and version-range strategy tables.
//!
//! Capability behavior that differs between OS releases (which foreground
//! companions a background capability needs, how long to wait before reading
//! a result) is expressed as a [`VersionTable`]: an explicit, ordered list of
//! `(VersionRange, value)` rules. Tables are resolved once per OS version when
//! a [`Catalog`](crate::Catalog) is turned into a registry, never probed at
//! request time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An OS API level.
///
/// Ordering follows the numeric level, so `OsVersion::ANDROID_10 <
/// OsVersion::ANDROID_11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OsVersion(u32);

impl OsVersion {
    /// API 19.
    pub const ANDROID_4_4: Self = Self(19);
    /// API 21.
    pub const ANDROID_5: Self = Self(21);
    /// API 23, the first release with runtime permission prompts.
    pub const ANDROID_6: Self = Self(23);
    /// API 24.
    pub const ANDROID_7: Self = Self(24);
    /// API 26.
    pub const ANDROID_8: Self = Self(26);
    /// API 28.
    pub const ANDROID_9: Self = Self(28);
    /// API 29.
    pub const ANDROID_10: Self = Self(29);
    /// API 30.
    pub const ANDROID_11: Self = Self(30);
    /// API 31.
    pub const ANDROID_12: Self = Self(31);
    /// API 32.
    pub const ANDROID_12_L: Self = Self(32);
    /// API 33.
    pub const ANDROID_13: Self = Self(33);
    /// API 34.
    pub const ANDROID_14: Self = Self(34);
    /// API 35.
    pub const ANDROID_15: Self = Self(35);
    /// API 36.
    pub const ANDROID_16: Self = Self(36);

    /// Creates a version from a raw API level.
    #[must_use]
    pub const fn new(level: u32) -> Self {
        Self(level)
    }

    /// Returns the raw API level.
    #[must_use]
    pub const fn level(self) -> u32 {
        self.0
    }

    /// Whether this version is at or above `other`.
    #[must_use]
    pub fn is_at_least(self, other: Self) -> bool {
        self >= other
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API {}", self.0)
    }
}

impl From<u32> for OsVersion {
    fn from(level: u32) -> Self {
        Self(level)
    }
}

impl FromStr for OsVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("API ")
            .or_else(|| trimmed.strip_prefix("api "))
            .unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|_| CoreError::InvalidVersion(s.to_string()))
    }
}

/// A half-open range of OS versions: `from` inclusive, `until` exclusive.
///
/// A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    /// Lowest matching version (inclusive).
    pub from: Option<OsVersion>,
    /// First version that no longer matches (exclusive).
    pub until: Option<OsVersion>,
}

impl VersionRange {
    /// Matches every version.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            from: None,
            until: None,
        }
    }

    /// Matches `version` and everything newer.
    #[must_use]
    pub const fn from(version: OsVersion) -> Self {
        Self {
            from: Some(version),
            until: None,
        }
    }

    /// Matches everything older than `version`.
    #[must_use]
    pub const fn below(version: OsVersion) -> Self {
        Self {
            from: None,
            until: Some(version),
        }
    }

    /// Matches `[from, until)`.
    #[must_use]
    pub const fn between(from: OsVersion, until: OsVersion) -> Self {
        Self {
            from: Some(from),
            until: Some(until),
        }
    }

    /// Whether `version` falls inside this range.
    #[must_use]
    pub fn contains(&self, version: OsVersion) -> bool {
        self.from.is_none_or(|from| version >= from)
            && self.until.is_none_or(|until| version < until)
    }
}

/// Version-keyed strategy table.
///
/// Rules are checked in insertion order; the first range containing the
/// requested version wins. If none match, the fallback applies.
///
/// # Example
///
/// ```
/// use permflow_core::{OsVersion, VersionRange, VersionTable};
///
/// let wait = VersionTable::constant(300_u64).when(VersionRange::from(OsVersion::ANDROID_11), 200);
/// assert_eq!(*wait.resolve(OsVersion::ANDROID_10), 300);
/// assert_eq!(*wait.resolve(OsVersion::ANDROID_13), 200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTable<T> {
    rules: Vec<(VersionRange, T)>,
    fallback: T,
}

impl<T> VersionTable<T> {
    /// A table that resolves to `value` on every version.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self {
            rules: Vec::new(),
            fallback: value,
        }
    }

    /// Adds a rule. Earlier rules take precedence over later ones.
    #[must_use]
    pub fn when(mut self, range: VersionRange, value: T) -> Self {
        self.rules.push((range, value));
        self
    }

    /// Resolves the value for `version`.
    #[must_use]
    pub fn resolve(&self, version: OsVersion) -> &T {
        self.rules
            .iter()
            .find(|(range, _)| range.contains(version))
            .map_or(&self.fallback, |(_, value)| value)
    }
}

impl<T: Default> Default for VersionTable<T> {
    fn default() -> Self {
        Self::constant(T::default())
    }
}
