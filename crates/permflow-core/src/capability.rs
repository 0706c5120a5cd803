//! Capability descriptors.
//!
//! A [`Capability`] is one permission as it behaves on the running OS
//! version: its dispatch [`Channel`], timing constraints, grouping and the
//! legacy/companion relationships the resolver uses. Capabilities are built
//! once from a [`Catalog`](crate::Catalog) and are immutable afterwards.
//!
//! Instead of a class hierarchy, behavior is selected by a
//! [`CapabilityKind`] tag carrying a small behavior table (channel,
//! manifest requirement, result wait).

use std::borrow::Borrow;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::version::OsVersion;

/// Stable capability identity.
///
/// Two capabilities are the same capability when their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityName(String);

impl CapabilityName {
    /// Creates a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CapabilityName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for CapabilityName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&CapabilityName> for CapabilityName {
    fn from(name: &CapabilityName) -> Self {
        name.clone()
    }
}

impl Borrow<str> for CapabilityName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CapabilityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How a capability is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// An interactive system prompt answered in place.
    InteractivePrompt,
    /// Navigation to a settings page; the result is read when the user
    /// returns to the host.
    SettingsNavigation,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InteractivePrompt => write!(f, "interactive_prompt"),
            Self::SettingsNavigation => write!(f, "settings_navigation"),
        }
    }
}

/// Behavior class of a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Requested through the interactive prompt. Must be declared in the
    /// manifest; can end up in the "do not ask again" state.
    Dangerous,
    /// Granted on a settings page. No manifest declaration by default and no
    /// "do not ask again" state.
    Special,
}

impl CapabilityKind {
    /// Default dispatch channel for this kind.
    #[must_use]
    pub fn channel(self) -> Channel {
        match self {
            Self::Dangerous => Channel::InteractivePrompt,
            Self::Special => Channel::SettingsNavigation,
        }
    }

    /// Whether capabilities of this kind must be declared in the manifest.
    #[must_use]
    pub fn requires_declaration(self) -> bool {
        matches!(self, Self::Dangerous)
    }

    /// Whether the "do not ask again" heuristic applies to this kind.
    #[must_use]
    pub fn supports_do_not_ask_again(self) -> bool {
        matches!(self, Self::Dangerous)
    }
}

/// Manifest requirements checked before a capability is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManifestRule {
    /// The capability must appear in the declared-capability index.
    pub declaration_required: bool,
    /// When declared with a max version, that max version must be at least
    /// this value.
    pub min_max_version: Option<OsVersion>,
}

/// A candidate settings page for a capability.
///
/// The host decides how each target maps onto a concrete navigation; the
/// engine only knows the preferred order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "action")]
pub enum SettingsTarget {
    /// A capability-specific settings action (e.g. the overlay permission page).
    Action(String),
    /// The application's details page.
    AppDetails,
    /// The list of installed applications.
    ManageApplications,
    /// The applications settings root.
    ApplicationSettings,
    /// The system settings root.
    SystemSettings,
}

impl SettingsTarget {
    /// The generic fallback list used when no capability-specific page fits.
    #[must_use]
    pub fn common_fallback() -> Vec<Self> {
        vec![
            Self::AppDetails,
            Self::ManageApplications,
            Self::ApplicationSettings,
            Self::SystemSettings,
        ]
    }
}

/// One capability, resolved for a specific OS version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub(crate) name: CapabilityName,
    pub(crate) kind: CapabilityKind,
    pub(crate) channel: Channel,
    pub(crate) introduced: OsVersion,
    pub(crate) min_target_version: OsVersion,
    pub(crate) group: Option<String>,
    pub(crate) legacy: Vec<CapabilityName>,
    pub(crate) foreground: Vec<CapabilityName>,
    pub(crate) request_interval: Duration,
    pub(crate) result_wait: Duration,
    pub(crate) manifest: ManifestRule,
    pub(crate) settings_targets: Vec<SettingsTarget>,
    pub(crate) supported: bool,
}

impl Capability {
    /// Stable name.
    #[must_use]
    pub fn name(&self) -> &CapabilityName {
        &self.name
    }

    /// Behavior class.
    #[must_use]
    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    /// Dispatch channel on this OS version.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// First OS version that knows this capability.
    #[must_use]
    pub fn introduced(&self) -> OsVersion {
        self.introduced
    }

    /// Lowest target version an application must declare to use it.
    #[must_use]
    pub fn min_target_version(&self) -> OsVersion {
        self.min_target_version
    }

    /// Prompt group; capabilities sharing a group are prompted together.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Older capabilities substituted when the OS predates this one.
    #[must_use]
    pub fn legacy_equivalents(&self) -> &[CapabilityName] {
        &self.legacy
    }

    /// Foreground capabilities that must be granted before this one.
    ///
    /// Non-empty only for background capabilities.
    #[must_use]
    pub fn foreground_companions(&self) -> &[CapabilityName] {
        &self.foreground
    }

    /// Whether this is a background capability.
    #[must_use]
    pub fn is_background(&self) -> bool {
        !self.foreground.is_empty()
    }

    /// Minimum delay before dispatching this capability after a previous
    /// prompt.
    #[must_use]
    pub fn request_interval(&self) -> Duration {
        self.request_interval
    }

    /// Minimum delay between the OS callback and reading the grant state.
    #[must_use]
    pub fn result_wait(&self) -> Duration {
        self.result_wait
    }

    /// Manifest requirements.
    #[must_use]
    pub fn manifest_rule(&self) -> ManifestRule {
        self.manifest
    }

    /// Ordered candidate settings pages.
    #[must_use]
    pub fn settings_targets(&self) -> &[SettingsTarget] {
        &self.settings_targets
    }

    /// Whether the running OS knows this capability.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.supported
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.name, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_behavior_table() {
        assert_eq!(CapabilityKind::Dangerous.channel(), Channel::InteractivePrompt);
        assert_eq!(CapabilityKind::Special.channel(), Channel::SettingsNavigation);
        assert!(CapabilityKind::Dangerous.requires_declaration());
        assert!(!CapabilityKind::Special.requires_declaration());
        assert!(!CapabilityKind::Special.supports_do_not_ask_again());
    }

    #[test]
    fn test_name_conversions() {
        let name = CapabilityName::from("android.permission.CAMERA");
        assert_eq!(name.as_str(), "android.permission.CAMERA");
        assert_eq!(name.to_string(), "android.permission.CAMERA");
        assert_eq!(name, CapabilityName::new(String::from("android.permission.CAMERA")));
    }

    #[test]
    fn test_settings_target_serde() {
        let json = serde_json::to_value(SettingsTarget::Action("overlay".into())).unwrap();
        assert_eq!(json["kind"], "action");
        assert_eq!(json["action"], "overlay");

        let json = serde_json::to_value(SettingsTarget::AppDetails).unwrap();
        assert_eq!(json["kind"], "app_details");
    }
}
