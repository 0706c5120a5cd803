//! Well-known capability names used by the built-in catalog.

/// Precise location.
pub const ACCESS_FINE_LOCATION: &str = "android.permission.ACCESS_FINE_LOCATION";
/// Approximate location.
pub const ACCESS_COARSE_LOCATION: &str = "android.permission.ACCESS_COARSE_LOCATION";
/// Location while the app is in the background.
pub const ACCESS_BACKGROUND_LOCATION: &str = "android.permission.ACCESS_BACKGROUND_LOCATION";
/// Location metadata embedded in shared media.
pub const ACCESS_MEDIA_LOCATION: &str = "android.permission.ACCESS_MEDIA_LOCATION";

/// Body sensors.
pub const BODY_SENSORS: &str = "android.permission.BODY_SENSORS";
/// Body sensors while the app is in the background.
pub const BODY_SENSORS_BACKGROUND: &str = "android.permission.BODY_SENSORS_BACKGROUND";
/// Physical activity recognition.
pub const ACTIVITY_RECOGNITION: &str = "android.permission.ACTIVITY_RECOGNITION";

/// Shared storage read access.
pub const READ_EXTERNAL_STORAGE: &str = "android.permission.READ_EXTERNAL_STORAGE";
/// Shared storage write access.
pub const WRITE_EXTERNAL_STORAGE: &str = "android.permission.WRITE_EXTERNAL_STORAGE";
/// Shared images.
pub const READ_MEDIA_IMAGES: &str = "android.permission.READ_MEDIA_IMAGES";
/// Shared videos.
pub const READ_MEDIA_VIDEO: &str = "android.permission.READ_MEDIA_VIDEO";
/// Shared audio.
pub const READ_MEDIA_AUDIO: &str = "android.permission.READ_MEDIA_AUDIO";
/// User-selected subset of shared images and videos.
pub const READ_MEDIA_VISUAL_USER_SELECTED: &str =
    "android.permission.READ_MEDIA_VISUAL_USER_SELECTED";

/// Notification posting.
pub const POST_NOTIFICATIONS: &str = "android.permission.POST_NOTIFICATIONS";
/// Notification switch in the app's settings page.
pub const NOTIFICATION_SERVICE: &str = "android.permission.NOTIFICATION_SERVICE";

/// Bluetooth discovery.
pub const BLUETOOTH_SCAN: &str = "android.permission.BLUETOOTH_SCAN";
/// Bluetooth connections to paired devices.
pub const BLUETOOTH_CONNECT: &str = "android.permission.BLUETOOTH_CONNECT";
/// Bluetooth advertising.
pub const BLUETOOTH_ADVERTISE: &str = "android.permission.BLUETOOTH_ADVERTISE";
/// Nearby Wi-Fi devices.
pub const NEARBY_WIFI_DEVICES: &str = "android.permission.NEARBY_WIFI_DEVICES";

/// Camera.
pub const CAMERA: &str = "android.permission.CAMERA";
/// Microphone.
pub const RECORD_AUDIO: &str = "android.permission.RECORD_AUDIO";

/// Read contacts.
pub const READ_CONTACTS: &str = "android.permission.READ_CONTACTS";
/// Write contacts.
pub const WRITE_CONTACTS: &str = "android.permission.WRITE_CONTACTS";
/// Account list.
pub const GET_ACCOUNTS: &str = "android.permission.GET_ACCOUNTS";

/// Read calendar.
pub const READ_CALENDAR: &str = "android.permission.READ_CALENDAR";
/// Write calendar.
pub const WRITE_CALENDAR: &str = "android.permission.WRITE_CALENDAR";

/// Phone state.
pub const READ_PHONE_STATE: &str = "android.permission.READ_PHONE_STATE";
/// Phone numbers.
pub const READ_PHONE_NUMBERS: &str = "android.permission.READ_PHONE_NUMBERS";
/// Place calls.
pub const CALL_PHONE: &str = "android.permission.CALL_PHONE";
/// Answer incoming calls.
pub const ANSWER_PHONE_CALLS: &str = "android.permission.ANSWER_PHONE_CALLS";

/// Send SMS.
pub const SEND_SMS: &str = "android.permission.SEND_SMS";
/// Receive SMS.
pub const RECEIVE_SMS: &str = "android.permission.RECEIVE_SMS";
/// Read SMS.
pub const READ_SMS: &str = "android.permission.READ_SMS";

/// Draw over other apps.
pub const SYSTEM_ALERT_WINDOW: &str = "android.permission.SYSTEM_ALERT_WINDOW";
/// Modify system settings.
pub const WRITE_SETTINGS: &str = "android.permission.WRITE_SETTINGS";
/// All-files access.
pub const MANAGE_EXTERNAL_STORAGE: &str = "android.permission.MANAGE_EXTERNAL_STORAGE";
/// Install other packages.
pub const REQUEST_INSTALL_PACKAGES: &str = "android.permission.REQUEST_INSTALL_PACKAGES";
/// Exact alarms.
pub const SCHEDULE_EXACT_ALARM: &str = "android.permission.SCHEDULE_EXACT_ALARM";
/// Do-not-disturb access.
pub const ACCESS_NOTIFICATION_POLICY: &str = "android.permission.ACCESS_NOTIFICATION_POLICY";
/// Usage statistics.
pub const PACKAGE_USAGE_STATS: &str = "android.permission.PACKAGE_USAGE_STATS";
/// Battery optimization exemption.
pub const REQUEST_IGNORE_BATTERY_OPTIMIZATIONS: &str =
    "android.permission.REQUEST_IGNORE_BATTERY_OPTIMIZATIONS";

/// Prompt group names.
pub mod groups {
    /// Location group.
    pub const LOCATION: &str = "location_group";
    /// Body sensor group.
    pub const SENSORS: &str = "sensors_group";
    /// Shared storage group.
    pub const STORAGE: &str = "storage_group";
    /// Images and videos group.
    pub const IMAGE_AND_VIDEO_MEDIA: &str = "image_and_video_media_group";
    /// Nearby devices group.
    pub const NEARBY_DEVICES: &str = "nearby_devices_group";
    /// Contacts group.
    pub const CONTACTS: &str = "contacts_group";
    /// Calendar group.
    pub const CALENDAR: &str = "calendar_group";
    /// Phone group.
    pub const PHONE: &str = "phone_group";
    /// SMS group.
    pub const SMS: &str = "sms_group";
}
