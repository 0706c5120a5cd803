//! Platform capabilities known out of the box.

use std::time::Duration;

use super::names::{self, groups};
use super::{CapabilitySpec, Catalog, background_location_companions};
use crate::version::OsVersion;

/// Delay some releases need between a foreground grant and the background
/// prompt that depends on it.
const BACKGROUND_REQUEST_INTERVAL: Duration = Duration::from_millis(150);

pub(super) fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for spec in location()
        .into_iter()
        .chain(sensors())
        .chain(storage())
        .chain(notifications())
        .chain(nearby_devices())
        .chain(personal_data())
        .chain(special())
    {
        catalog.insert(spec);
    }
    catalog
}

fn location() -> Vec<CapabilitySpec> {
    vec![
        CapabilitySpec::dangerous(names::ACCESS_FINE_LOCATION, OsVersion::ANDROID_6)
            .group(groups::LOCATION),
        CapabilitySpec::dangerous(names::ACCESS_COARSE_LOCATION, OsVersion::ANDROID_6)
            .group(groups::LOCATION),
        CapabilitySpec::dangerous(names::ACCESS_BACKGROUND_LOCATION, OsVersion::ANDROID_10)
            .group(groups::LOCATION)
            .legacy([names::ACCESS_FINE_LOCATION])
            .foreground_table(background_location_companions())
            .request_interval(BACKGROUND_REQUEST_INTERVAL),
        CapabilitySpec::dangerous(names::ACCESS_MEDIA_LOCATION, OsVersion::ANDROID_10),
    ]
}

fn sensors() -> Vec<CapabilitySpec> {
    vec![
        CapabilitySpec::dangerous(names::BODY_SENSORS, OsVersion::ANDROID_6)
            .group(groups::SENSORS),
        CapabilitySpec::dangerous(names::BODY_SENSORS_BACKGROUND, OsVersion::ANDROID_13)
            .group(groups::SENSORS)
            .legacy([names::BODY_SENSORS])
            .foreground([names::BODY_SENSORS])
            .request_interval(BACKGROUND_REQUEST_INTERVAL),
        CapabilitySpec::dangerous(names::ACTIVITY_RECOGNITION, OsVersion::ANDROID_10),
    ]
}

fn storage() -> Vec<CapabilitySpec> {
    vec![
        CapabilitySpec::dangerous(names::READ_EXTERNAL_STORAGE, OsVersion::ANDROID_6)
            .group(groups::STORAGE),
        CapabilitySpec::dangerous(names::WRITE_EXTERNAL_STORAGE, OsVersion::ANDROID_6)
            .group(groups::STORAGE)
            .min_max_version(OsVersion::ANDROID_10),
        CapabilitySpec::dangerous(names::READ_MEDIA_IMAGES, OsVersion::ANDROID_13)
            .group(groups::IMAGE_AND_VIDEO_MEDIA)
            .legacy([names::READ_EXTERNAL_STORAGE]),
        CapabilitySpec::dangerous(names::READ_MEDIA_VIDEO, OsVersion::ANDROID_13)
            .group(groups::IMAGE_AND_VIDEO_MEDIA)
            .legacy([names::READ_EXTERNAL_STORAGE]),
        CapabilitySpec::dangerous(names::READ_MEDIA_AUDIO, OsVersion::ANDROID_13)
            .legacy([names::READ_EXTERNAL_STORAGE]),
        CapabilitySpec::dangerous(names::READ_MEDIA_VISUAL_USER_SELECTED, OsVersion::ANDROID_14)
            .group(groups::IMAGE_AND_VIDEO_MEDIA),
    ]
}

fn notifications() -> Vec<CapabilitySpec> {
    vec![
        CapabilitySpec::dangerous(names::POST_NOTIFICATIONS, OsVersion::ANDROID_13)
            .legacy([names::NOTIFICATION_SERVICE]),
        CapabilitySpec::special(names::NOTIFICATION_SERVICE, OsVersion::ANDROID_4_4)
            .settings_action("android.settings.APP_NOTIFICATION_SETTINGS"),
    ]
}

fn nearby_devices() -> Vec<CapabilitySpec> {
    vec![
        CapabilitySpec::dangerous(names::BLUETOOTH_SCAN, OsVersion::ANDROID_12)
            .group(groups::NEARBY_DEVICES)
            .legacy([names::ACCESS_FINE_LOCATION])
            .min_target_version(OsVersion::ANDROID_6),
        CapabilitySpec::dangerous(names::BLUETOOTH_CONNECT, OsVersion::ANDROID_12)
            .group(groups::NEARBY_DEVICES)
            .min_target_version(OsVersion::ANDROID_6),
        CapabilitySpec::dangerous(names::BLUETOOTH_ADVERTISE, OsVersion::ANDROID_12)
            .group(groups::NEARBY_DEVICES)
            .min_target_version(OsVersion::ANDROID_6),
        CapabilitySpec::dangerous(names::NEARBY_WIFI_DEVICES, OsVersion::ANDROID_13)
            .group(groups::NEARBY_DEVICES)
            .legacy([names::ACCESS_FINE_LOCATION])
            .min_target_version(OsVersion::ANDROID_6),
    ]
}

fn personal_data() -> Vec<CapabilitySpec> {
    let plain = |name: &'static str| CapabilitySpec::dangerous(name, OsVersion::ANDROID_6);
    vec![
        plain(names::CAMERA),
        plain(names::RECORD_AUDIO),
        plain(names::READ_CONTACTS).group(groups::CONTACTS),
        plain(names::WRITE_CONTACTS).group(groups::CONTACTS),
        plain(names::GET_ACCOUNTS).group(groups::CONTACTS),
        plain(names::READ_CALENDAR).group(groups::CALENDAR),
        plain(names::WRITE_CALENDAR).group(groups::CALENDAR),
        plain(names::READ_PHONE_STATE).group(groups::PHONE),
        plain(names::CALL_PHONE).group(groups::PHONE),
        CapabilitySpec::dangerous(names::READ_PHONE_NUMBERS, OsVersion::ANDROID_8)
            .group(groups::PHONE)
            .legacy([names::READ_PHONE_STATE]),
        CapabilitySpec::dangerous(names::ANSWER_PHONE_CALLS, OsVersion::ANDROID_8)
            .group(groups::PHONE),
        plain(names::SEND_SMS).group(groups::SMS),
        plain(names::RECEIVE_SMS).group(groups::SMS),
        plain(names::READ_SMS).group(groups::SMS),
    ]
}

fn special() -> Vec<CapabilitySpec> {
    vec![
        CapabilitySpec::special(names::SYSTEM_ALERT_WINDOW, OsVersion::ANDROID_6)
            .declaration_required(true)
            .settings_action("android.settings.action.MANAGE_OVERLAY_PERMISSION"),
        CapabilitySpec::special(names::WRITE_SETTINGS, OsVersion::ANDROID_6)
            .declaration_required(true)
            .settings_action("android.settings.action.MANAGE_WRITE_SETTINGS"),
        CapabilitySpec::special(names::MANAGE_EXTERNAL_STORAGE, OsVersion::ANDROID_11)
            .declaration_required(true)
            .legacy([names::READ_EXTERNAL_STORAGE, names::WRITE_EXTERNAL_STORAGE])
            .settings_action("android.settings.MANAGE_APP_ALL_FILES_ACCESS_PERMISSION"),
        CapabilitySpec::special(names::REQUEST_INSTALL_PACKAGES, OsVersion::ANDROID_8)
            .declaration_required(true)
            .settings_action("android.settings.MANAGE_UNKNOWN_APP_SOURCES"),
        CapabilitySpec::special(names::SCHEDULE_EXACT_ALARM, OsVersion::ANDROID_12)
            .declaration_required(true)
            .settings_action("android.settings.REQUEST_SCHEDULE_EXACT_ALARM"),
        CapabilitySpec::special(names::ACCESS_NOTIFICATION_POLICY, OsVersion::ANDROID_6)
            .settings_action("android.settings.NOTIFICATION_POLICY_ACCESS_SETTINGS"),
        CapabilitySpec::special(names::PACKAGE_USAGE_STATS, OsVersion::ANDROID_5)
            .declaration_required(true)
            .settings_action("android.settings.USAGE_ACCESS_SETTINGS"),
        CapabilitySpec::special(names::REQUEST_IGNORE_BATTERY_OPTIMIZATIONS, OsVersion::ANDROID_6)
            .declaration_required(true)
            .settings_action("android.settings.REQUEST_IGNORE_BATTERY_OPTIMIZATIONS"),
    ]
}
