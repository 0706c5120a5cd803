//! Cycle-level and step-level hooks.
//!
//! Hooks are notifications. The only control they have is declining: an
//! interceptor may skip a whole cycle, a description hook may skip a
//! single step. Neither can change the outcome of a step that ran.

use async_trait::async_trait;
use permflow_core::{CapabilityName, Channel, Outcome};
use serde::Serialize;
use uuid::Uuid;

/// Whether a cycle should dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptDecision {
    /// Run the cycle.
    #[default]
    Continue,
    /// Do not attach or dispatch; classify the current state and deliver.
    Skip,
}

/// What a cycle is about to do.
#[derive(Debug, Clone, Serialize)]
pub struct CycleInfo {
    /// Correlation id.
    pub cycle_id: Uuid,
    /// Host the cycle is bound to.
    pub host_id: String,
    /// Capabilities as the caller asked for them.
    pub requested: Vec<CapabilityName>,
    /// Capabilities after compatibility normalization.
    pub normalized: Vec<CapabilityName>,
}

/// One dispatch step.
#[derive(Debug, Clone, Serialize)]
pub struct StepInfo {
    /// Correlation id of the owning cycle.
    pub cycle_id: Uuid,
    /// Zero-based step index.
    pub index: usize,
    /// Dispatch channel.
    pub channel: Channel,
    /// Capabilities in the step.
    pub capabilities: Vec<CapabilityName>,
}

/// Observes whole cycles.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Called before the host is attached.
    async fn on_request_start(&self, _cycle: &CycleInfo) -> InterceptDecision {
        InterceptDecision::Continue
    }

    /// Called after the callback fired. Not called for abandoned cycles.
    async fn on_request_end(&self, _cycle: &CycleInfo, _outcome: &Outcome, _skipped: bool) {}
}

/// Observes individual dispatch steps, typically to show an explanation
/// next to the system prompt.
#[async_trait]
pub trait DescriptionHook: Send + Sync {
    /// Whether `step` should be dispatched. Declining skips only this step.
    async fn ask_whether_request(&self, _step: &StepInfo) -> bool {
        true
    }

    /// Called right before dispatch.
    async fn on_step_start(&self, _step: &StepInfo) {}

    /// Called once the step resolved and its result wait elapsed.
    async fn on_step_end(&self, _step: &StepInfo) {}
}
