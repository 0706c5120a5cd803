//! The host abstraction.
//!
//! A host is the transient UI container a cycle is bound to. Concrete UI
//! toolkits implement [`Host`] outside this crate; the orchestrator only
//! sees these calls plus the [`HostEvents`](crate::HostEvents) the host
//! reports back.

use permflow_core::{CapabilityName, SettingsTarget};
use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::events::HostEvents;

/// An interactive prompt to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    /// Code the answer must carry.
    pub request_code: u16,
    /// Capabilities to prompt for, in dispatch order.
    pub capabilities: Vec<CapabilityName>,
}

/// A UI container that can host one request cycle at a time.
///
/// Every call returns immediately; outcomes arrive later through the
/// [`HostEvents`] handed over in [`Host::attach`].
pub trait Host: Send + Sync {
    /// Stable identifier. At most one cycle runs per id.
    fn id(&self) -> &str;

    /// Binds the host to a cycle.
    ///
    /// The host must report [`HostEvents::resumed`] once it is visible.
    ///
    /// # Errors
    ///
    /// [`HostError::Destroyed`] abandons the cycle; any other error skips
    /// dispatch and classifies the current state.
    fn attach(&self, events: HostEvents) -> Result<(), HostError>;

    /// Shows the system prompt for `request`.
    ///
    /// # Errors
    ///
    /// [`HostError::Destroyed`] abandons the cycle; any other error resolves
    /// the step without waiting.
    fn request_prompt(&self, request: PromptRequest) -> Result<(), HostError>;

    /// Opens `target` for `capabilities`. The host reports
    /// [`HostEvents::resumed`] when the user comes back.
    ///
    /// # Errors
    ///
    /// Any error other than [`HostError::Destroyed`] makes the caller try the
    /// next candidate target.
    fn navigate(
        &self,
        target: &SettingsTarget,
        capabilities: &[CapabilityName],
    ) -> Result<(), HostError>;

    /// Releases the binding created by [`Host::attach`].
    fn detach(&self);

    /// Whether the container is already gone.
    fn is_destroyed(&self) -> bool;
}
