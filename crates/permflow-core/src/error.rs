/// Errors raised while building or querying a capability registry.
///
/// These are configuration problems in the capability catalog itself, never
/// runtime grant/deny outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A capability name is not present in the registry.
    #[error("unknown capability: {name}")]
    UnknownCapability {
        /// The name that failed to resolve.
        name: String,
    },

    /// A capability lists itself as a legacy equivalent or companion.
    #[error("capability {name} references itself")]
    SelfReference {
        /// The offending capability.
        name: String,
    },

    /// Legacy-equivalent or companion edges form a cycle.
    #[error("capability reference cycle through {name}")]
    ReferenceCycle {
        /// A capability on the cycle.
        name: String,
    },

    /// A capability references a name the catalog does not define.
    #[error("capability {from} references undefined capability {to}")]
    DanglingReference {
        /// The referencing capability.
        from: String,
        /// The missing target.
        to: String,
    },

    /// An OS version string could not be parsed.
    #[error("invalid os version: {0}")]
    InvalidVersion(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
