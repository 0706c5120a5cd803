//! Settings-page selection for a set of capabilities.

use crate::capability::{CapabilityName, Channel, SettingsTarget};
use crate::registry::CapabilityRegistry;

/// Picks the ordered settings targets that best cover `names`.
///
/// Capabilities the running OS does not know, and legacy equivalents of a
/// settings capability in the same set, are ignored. If the remaining
/// capabilities all share one target list it is returned, otherwise the
/// generic app-details fallback.
#[must_use]
pub fn best_settings_targets(
    registry: &CapabilityRegistry,
    names: &[CapabilityName],
) -> Vec<SettingsTarget> {
    let capabilities: Vec<_> = names
        .iter()
        .filter_map(|name| registry.get(name.as_str()))
        .filter(|capability| capability.is_supported())
        .collect();

    let superseded = |name: &CapabilityName| {
        capabilities.iter().any(|other| {
            other.channel() == Channel::SettingsNavigation
                && other.legacy_equivalents().contains(name)
        })
    };

    let mut remaining = capabilities
        .iter()
        .filter(|capability| !superseded(capability.name()));

    let Some(first) = remaining.next() else {
        return SettingsTarget::common_fallback();
    };
    let targets = first.settings_targets();
    if remaining.all(|capability| capability.settings_targets() == targets) {
        targets.to_vec()
    } else {
        SettingsTarget::common_fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, names};
    use crate::version::OsVersion;

    fn targets(os: OsVersion, requested: &[&str]) -> Vec<SettingsTarget> {
        let registry = Catalog::builtin().resolve(os).unwrap();
        let names: Vec<CapabilityName> = requested.iter().copied().map(Into::into).collect();
        best_settings_targets(&registry, &names)
    }

    fn action(target: &SettingsTarget) -> Option<&str> {
        match target {
            SettingsTarget::Action(action) => Some(action.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_single_special_capability_uses_its_page() {
        let list = targets(OsVersion::ANDROID_13, &[names::SYSTEM_ALERT_WINDOW]);
        assert_eq!(
            action(&list[0]),
            Some("android.settings.action.MANAGE_OVERLAY_PERMISSION")
        );
    }

    #[test]
    fn test_mixed_capabilities_fall_back_to_app_details() {
        let list = targets(
            OsVersion::ANDROID_13,
            &[names::SYSTEM_ALERT_WINDOW, names::WRITE_SETTINGS],
        );
        assert_eq!(list, SettingsTarget::common_fallback());
    }

    #[test]
    fn test_dangerous_capabilities_share_app_details() {
        let list = targets(OsVersion::ANDROID_13, &[names::CAMERA, names::RECORD_AUDIO]);
        assert_eq!(list[0], SettingsTarget::AppDetails);
    }

    #[test]
    fn test_superseded_legacy_equivalents_ignored() {
        let list = targets(
            OsVersion::ANDROID_13,
            &[names::MANAGE_EXTERNAL_STORAGE, names::READ_EXTERNAL_STORAGE],
        );
        assert_eq!(
            action(&list[0]),
            Some("android.settings.MANAGE_APP_ALL_FILES_ACCESS_PERMISSION")
        );
    }

    #[test]
    fn test_unsupported_capabilities_ignored() {
        let list = targets(
            OsVersion::ANDROID_10,
            &[names::MANAGE_EXTERNAL_STORAGE, names::WRITE_SETTINGS],
        );
        assert_eq!(
            action(&list[0]),
            Some("android.settings.action.MANAGE_WRITE_SETTINGS")
        );
    }

    #[test]
    fn test_empty_input_falls_back() {
        assert_eq!(targets(OsVersion::ANDROID_13, &[]), SettingsTarget::common_fallback());
    }
}
