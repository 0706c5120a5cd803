use permflow_core::OsVersion;

/// Manifest misconfiguration detected before any dispatch.
///
/// These are build-time problems. They are never retried and never turned
/// into grant/deny outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplianceError {
    /// The request contained no capabilities.
    #[error("the requested capability list is empty")]
    EmptyRequest,

    /// A capability that must be declared is missing from the manifest.
    #[error(
        "capability {capability} is not declared; add <uses-permission android:name=\"{capability}\" /> to the manifest"
    )]
    MissingDeclaration {
        /// The undeclared capability.
        capability: String,
    },

    /// A legacy equivalent used on older releases is missing from the
    /// manifest.
    #[error(
        "capability {capability} falls back to {legacy} below {introduced}, but {legacy} is not declared; add <uses-permission android:name=\"{legacy}\" /> to the manifest"
    )]
    MissingLegacyDeclaration {
        /// The requested capability.
        capability: String,
        /// The undeclared legacy equivalent.
        legacy: String,
        /// Release that introduced the requested capability.
        introduced: OsVersion,
    },

    /// The declared max version is lower than the capability needs.
    #[error(
        "capability {capability} is declared with max version {declared} but needs at least {required}; raise or remove android:maxSdkVersion"
    )]
    MaxVersionTooLow {
        /// The capability.
        capability: String,
        /// Max version in the manifest.
        declared: OsVersion,
        /// Minimum acceptable max version.
        required: OsVersion,
    },

    /// The application's target version is too low for the capability.
    #[error(
        "capability {capability} requires target version {required} or higher, but the application targets {target}"
    )]
    TargetVersionTooLow {
        /// The capability.
        capability: String,
        /// The application's target version.
        target: OsVersion,
        /// Minimum target version required.
        required: OsVersion,
    },
}

/// Result type for compliance checks.
pub type ComplianceResult<T> = Result<T, ComplianceError>;
