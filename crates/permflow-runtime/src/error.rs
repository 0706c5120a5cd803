use permflow_core::CoreError;
use permflow_manifest::ComplianceError;
use thiserror::Error;

/// Errors raised by a [`Host`](crate::Host) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host container no longer exists.
    #[error("host destroyed")]
    Destroyed,

    /// The host could not show the interactive prompt.
    #[error("prompt dispatch failed: {0}")]
    DispatchFailed(String),

    /// A settings target could not be opened.
    #[error("navigation to {target} failed: {reason}")]
    NavigationFailed {
        /// Debug rendering of the target that failed.
        target: String,
        /// Why it failed.
        reason: String,
    },
}

/// Errors returned synchronously by the requester.
///
/// Every variant is a configuration or usage problem detected before any
/// host binding exists. Denials are never errors; they are part of the
/// delivered [`Outcome`](permflow_core::Outcome).
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The request contained no capabilities.
    #[error("request contains no capabilities")]
    EmptyRequest,

    /// A requested capability is not in the registry.
    #[error("unknown capability: {name}")]
    UnknownCapability {
        /// The unknown name.
        name: String,
    },

    /// The manifest does not satisfy the request.
    #[error(transparent)]
    Compliance(#[from] ComplianceError),

    /// A cycle is already running on this host.
    #[error("a request cycle is already in flight on host {host_id}")]
    CycleInFlight {
        /// The busy host.
        host_id: String,
    },

    /// Capability registry error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Host error outside of a running cycle.
    #[error(transparent)]
    Host(#[from] HostError),

    /// No tokio runtime is available to drive the cycle.
    #[error("no tokio runtime available to drive the request cycle")]
    NoRuntime,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
