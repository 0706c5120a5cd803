use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a request cycle in its state machine.
///
/// ```text
/// Idle -> Attaching -> Dispatching(i) -> AwaitingResult(i) -> ... -> Classifying
///      -> Detaching -> Delivered
/// any non-terminal state -> Abandoned
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum CycleState {
    /// Created, not started.
    Idle,
    /// Waiting for the host to attach and resume.
    Attaching,
    /// Preparing step `step`.
    Dispatching {
        /// Zero-based step index.
        step: usize,
    },
    /// Step `step` was dispatched; waiting for the OS.
    AwaitingResult {
        /// Zero-based step index.
        step: usize,
    },
    /// Reading the final grant state.
    Classifying,
    /// Releasing the host binding.
    Detaching,
    /// The callback fired.
    Delivered,
    /// The host was destroyed first; the callback never fires.
    Abandoned,
}

impl CycleState {
    /// Whether no further transitions can happen.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Abandoned)
    }
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Attaching => write!(f, "attaching"),
            Self::Dispatching { step } => write!(f, "dispatching({step})"),
            Self::AwaitingResult { step } => write!(f, "awaiting_result({step})"),
            Self::Classifying => write!(f, "classifying"),
            Self::Detaching => write!(f, "detaching"),
            Self::Delivered => write!(f, "delivered"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}
