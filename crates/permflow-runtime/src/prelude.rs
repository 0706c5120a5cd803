//! Prelude module - commonly used types for convenient import.
//!
//! Use `use permflow_runtime::prelude::*;` to import all essential types.

// Errors
pub use crate::{HostError, RuntimeError, RuntimeResult};

// Requester
pub use crate::{CycleHandle, CycleState, PermissionRequester, RuntimeSettings};

// Host
pub use crate::{Host, HostEvent, HostEvents, PromptRequest};

// Hooks
pub use crate::{CycleInfo, DescriptionHook, InterceptDecision, RequestInterceptor, StepInfo};

// Tracking
pub use crate::{DoNotAskAgain, RequestedTracker};
