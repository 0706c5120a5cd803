//! Capability catalog.
//!
//! A [`Catalog`] is the static, OS-independent description of every known
//! capability. Each [`CapabilitySpec`] carries its version-dependent behavior
//! as [`VersionTable`]s; [`Catalog::resolve`] evaluates all of them for one OS
//! version and produces an immutable [`CapabilityRegistry`].

mod builtin;
pub mod names;

use std::time::Duration;

use crate::capability::{
    Capability, CapabilityKind, CapabilityName, ManifestRule, SettingsTarget,
};
use crate::error::CoreResult;
use crate::registry::CapabilityRegistry;
use crate::version::{OsVersion, VersionRange, VersionTable};

/// Result wait for settings-navigation capabilities on older releases.
const SPECIAL_RESULT_WAIT_LEGACY: Duration = Duration::from_millis(300);
/// Result wait for settings-navigation capabilities from API 30 on.
const SPECIAL_RESULT_WAIT: Duration = Duration::from_millis(200);

/// Version-independent description of one capability.
#[derive(Debug, Clone)]
pub struct CapabilitySpec {
    name: CapabilityName,
    kind: CapabilityKind,
    introduced: OsVersion,
    min_target_version: Option<OsVersion>,
    group: Option<String>,
    legacy: VersionTable<Vec<CapabilityName>>,
    foreground: VersionTable<Vec<CapabilityName>>,
    request_interval: VersionTable<Duration>,
    result_wait: Option<VersionTable<Duration>>,
    manifest: ManifestRule,
    settings_targets: Option<VersionTable<Vec<SettingsTarget>>>,
}

impl CapabilitySpec {
    /// A capability requested through the interactive prompt.
    #[must_use]
    pub fn dangerous(name: impl Into<CapabilityName>, introduced: OsVersion) -> Self {
        Self::with_kind(name.into(), CapabilityKind::Dangerous, introduced)
    }

    /// A capability granted on a settings page.
    #[must_use]
    pub fn special(name: impl Into<CapabilityName>, introduced: OsVersion) -> Self {
        Self::with_kind(name.into(), CapabilityKind::Special, introduced)
    }

    fn with_kind(name: CapabilityName, kind: CapabilityKind, introduced: OsVersion) -> Self {
        Self {
            name,
            kind,
            introduced,
            min_target_version: None,
            group: None,
            legacy: VersionTable::default(),
            foreground: VersionTable::default(),
            request_interval: VersionTable::constant(Duration::ZERO),
            result_wait: None,
            manifest: ManifestRule {
                declaration_required: kind.requires_declaration(),
                min_max_version: None,
            },
            settings_targets: None,
        }
    }

    /// Capability name.
    #[must_use]
    pub fn name(&self) -> &CapabilityName {
        &self.name
    }

    /// Prompt group.
    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Legacy equivalents substituted on releases older than `introduced`.
    #[must_use]
    pub fn legacy<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CapabilityName>,
    {
        self.legacy = VersionTable::constant(names.into_iter().map(Into::into).collect());
        self
    }

    /// Foreground companions, identical on every release.
    #[must_use]
    pub fn foreground<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CapabilityName>,
    {
        self.foreground = VersionTable::constant(names.into_iter().map(Into::into).collect());
        self
    }

    /// Foreground companions that differ between releases.
    #[must_use]
    pub fn foreground_table(mut self, table: VersionTable<Vec<CapabilityName>>) -> Self {
        self.foreground = table;
        self
    }

    /// Minimum delay before dispatching after a previous prompt.
    #[must_use]
    pub fn request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = VersionTable::constant(interval);
        self
    }

    /// Minimum delay between the result callback and reading grant state.
    #[must_use]
    pub fn result_wait(mut self, table: VersionTable<Duration>) -> Self {
        self.result_wait = Some(table);
        self
    }

    /// Lowest target version an application must declare.
    ///
    /// Defaults to the introduction version.
    #[must_use]
    pub fn min_target_version(mut self, version: OsVersion) -> Self {
        self.min_target_version = Some(version);
        self
    }

    /// Overrides whether the capability must be declared in the manifest.
    #[must_use]
    pub fn declaration_required(mut self, required: bool) -> Self {
        self.manifest.declaration_required = required;
        self
    }

    /// Requires a declared max version of at least `version`.
    #[must_use]
    pub fn min_max_version(mut self, version: OsVersion) -> Self {
        self.manifest.min_max_version = Some(version);
        self
    }

    /// Capability-specific settings action, tried before the common fallback.
    #[must_use]
    pub fn settings_action(mut self, action: impl Into<String>) -> Self {
        let mut targets = vec![SettingsTarget::Action(action.into())];
        targets.extend(SettingsTarget::common_fallback());
        self.settings_targets = Some(VersionTable::constant(targets));
        self
    }

    /// Full settings-target table.
    #[must_use]
    pub fn settings_targets(mut self, table: VersionTable<Vec<SettingsTarget>>) -> Self {
        self.settings_targets = Some(table);
        self
    }

    /// Evaluates every version table for `os`.
    #[must_use]
    pub fn resolve(&self, os: OsVersion) -> Capability {
        let supported = os.is_at_least(self.introduced);
        let channel = self.kind.channel();

        let result_wait = match &self.result_wait {
            Some(table) => *table.resolve(os),
            None => match self.kind {
                CapabilityKind::Dangerous => Duration::ZERO,
                CapabilityKind::Special if os.is_at_least(OsVersion::ANDROID_11) => {
                    SPECIAL_RESULT_WAIT
                },
                CapabilityKind::Special => SPECIAL_RESULT_WAIT_LEGACY,
            },
        };

        // Unsupported capabilities are never dispatched themselves.
        let (request_interval, result_wait) = if supported {
            (*self.request_interval.resolve(os), result_wait)
        } else {
            (Duration::ZERO, Duration::ZERO)
        };

        let settings_targets = self.settings_targets.as_ref().map_or_else(
            SettingsTarget::common_fallback,
            |table| table.resolve(os).clone(),
        );

        Capability {
            name: self.name.clone(),
            kind: self.kind,
            channel,
            introduced: self.introduced,
            min_target_version: self.min_target_version.unwrap_or(self.introduced),
            group: self.group.clone(),
            legacy: self.legacy.resolve(os).clone(),
            foreground: self.foreground.resolve(os).clone(),
            request_interval,
            result_wait,
            manifest: self.manifest,
            settings_targets,
            supported,
        }
    }
}

/// A collection of capability specs.
///
/// Later specs with the same name replace earlier ones, so a caller can
/// start from [`Catalog::builtin`] and override individual entries.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    specs: Vec<CapabilitySpec>,
}

impl Catalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog of platform capabilities.
    #[must_use]
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    /// Adds or replaces a spec.
    #[must_use]
    pub fn with(mut self, spec: CapabilitySpec) -> Self {
        self.insert(spec);
        self
    }

    /// Adds or replaces a spec in place.
    pub fn insert(&mut self, spec: CapabilitySpec) {
        if let Some(existing) = self.specs.iter_mut().find(|s| s.name == spec.name) {
            *existing = spec;
        } else {
            self.specs.push(spec);
        }
    }

    /// Looks up a spec by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CapabilitySpec> {
        self.specs.iter().find(|s| s.name.as_str() == name)
    }

    /// Number of specs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Resolves every spec for `os` and validates the reference graph.
    ///
    /// # Errors
    ///
    /// Returns an error if a capability references itself, an undefined
    /// capability, or participates in a legacy/companion cycle.
    pub fn resolve(&self, os: OsVersion) -> CoreResult<CapabilityRegistry> {
        let capabilities = self.specs.iter().map(|spec| spec.resolve(os)).collect();
        CapabilityRegistry::from_capabilities(os, capabilities)
    }
}

/// Companion table shared by the background location capability.
pub(crate) fn background_location_companions() -> VersionTable<Vec<CapabilityName>> {
    VersionTable::constant(vec![CapabilityName::from(names::ACCESS_FINE_LOCATION)]).when(
        VersionRange::from(OsVersion::ANDROID_12),
        vec![
            CapabilityName::from(names::ACCESS_FINE_LOCATION),
            CapabilityName::from(names::ACCESS_COARSE_LOCATION),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Channel;

    #[test]
    fn test_special_result_wait_by_version() {
        let spec = CapabilitySpec::special(names::WRITE_SETTINGS, OsVersion::ANDROID_6);
        assert_eq!(
            spec.resolve(OsVersion::ANDROID_10).result_wait(),
            Duration::from_millis(300)
        );
        assert_eq!(
            spec.resolve(OsVersion::ANDROID_11).result_wait(),
            Duration::from_millis(200)
        );
        assert_eq!(
            spec.resolve(OsVersion::ANDROID_11).channel(),
            Channel::SettingsNavigation
        );
    }

    #[test]
    fn test_unsupported_capability_has_no_timing() {
        let spec = CapabilitySpec::dangerous(names::ACCESS_BACKGROUND_LOCATION, OsVersion::ANDROID_10)
            .request_interval(Duration::from_millis(150));
        let old = spec.resolve(OsVersion::ANDROID_9);
        assert!(!old.is_supported());
        assert_eq!(old.request_interval(), Duration::ZERO);

        let new = spec.resolve(OsVersion::ANDROID_10);
        assert!(new.is_supported());
        assert_eq!(new.request_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_min_target_defaults_to_introduced() {
        let spec = CapabilitySpec::dangerous(names::POST_NOTIFICATIONS, OsVersion::ANDROID_13);
        assert_eq!(
            spec.resolve(OsVersion::ANDROID_14).min_target_version(),
            OsVersion::ANDROID_13
        );

        let spec = spec.min_target_version(OsVersion::ANDROID_6);
        assert_eq!(
            spec.resolve(OsVersion::ANDROID_14).min_target_version(),
            OsVersion::ANDROID_6
        );
    }

    #[test]
    fn test_settings_action_precedes_fallback() {
        let spec = CapabilitySpec::special(names::SYSTEM_ALERT_WINDOW, OsVersion::ANDROID_6)
            .settings_action("overlay");
        let targets = spec.resolve(OsVersion::ANDROID_13).settings_targets().to_vec();
        assert_eq!(targets[0], SettingsTarget::Action("overlay".into()));
        assert_eq!(&targets[1..], SettingsTarget::common_fallback().as_slice());
    }

    #[test]
    fn test_catalog_insert_replaces_by_name() {
        let catalog = Catalog::new()
            .with(CapabilitySpec::dangerous("x", OsVersion::ANDROID_6))
            .with(CapabilitySpec::special("x", OsVersion::ANDROID_6));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("x").unwrap().kind, CapabilityKind::Special);
    }

    #[test]
    fn test_background_location_companions_by_version() {
        let table = background_location_companions();
        assert_eq!(table.resolve(OsVersion::ANDROID_11).len(), 1);
        assert_eq!(table.resolve(OsVersion::ANDROID_12).len(), 2);
    }

    #[test]
    fn test_builtin_resolves_on_every_release() {
        for level in 19..=36 {
            let registry = Catalog::builtin().resolve(OsVersion::new(level)).unwrap();
            assert!(registry.len() > 30);
        }
    }
}
