//! Recording hooks and outcome capture.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use permflow_core::Outcome;
use permflow_runtime::{CycleInfo, DescriptionHook, InterceptDecision, RequestInterceptor, StepInfo};

/// Collects every outcome delivered through [`OutcomeCapture::callback`].
#[derive(Debug, Clone, Default)]
pub struct OutcomeCapture {
    outcomes: Arc<Mutex<Vec<Outcome>>>,
}

impl OutcomeCapture {
    /// An empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that records into this capture.
    #[must_use]
    pub fn callback(&self) -> impl FnOnce(Outcome) + Send + 'static {
        let outcomes = Arc::clone(&self.outcomes);
        move |outcome| {
            if let Ok(mut guard) = outcomes.lock() {
                guard.push(outcome);
            }
        }
    }

    /// Number of deliveries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.outcomes.lock().map(|g| g.len()).unwrap_or(0)
    }

    /// The most recent outcome.
    #[must_use]
    pub fn last(&self) -> Option<Outcome> {
        self.outcomes.lock().ok().and_then(|g| g.last().cloned())
    }
}

/// Interceptor that records calls and answers with a fixed decision.
#[derive(Debug, Default)]
pub struct RecordingInterceptor {
    decision: InterceptDecision,
    started: Mutex<Vec<CycleInfo>>,
    ended: Mutex<Vec<(Outcome, bool)>>,
}

impl RecordingInterceptor {
    /// An interceptor that always continues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An interceptor that always skips.
    #[must_use]
    pub fn skipping() -> Self {
        Self {
            decision: InterceptDecision::Skip,
            ..Self::default()
        }
    }

    /// Cycles seen by `on_request_start`.
    #[must_use]
    pub fn started(&self) -> Vec<CycleInfo> {
        self.started.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// `(outcome, skipped)` pairs seen by `on_request_end`.
    #[must_use]
    pub fn ended(&self) -> Vec<(Outcome, bool)> {
        self.ended.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RequestInterceptor for RecordingInterceptor {
    async fn on_request_start(&self, cycle: &CycleInfo) -> InterceptDecision {
        if let Ok(mut guard) = self.started.lock() {
            guard.push(cycle.clone());
        }
        self.decision
    }

    async fn on_request_end(&self, _cycle: &CycleInfo, outcome: &Outcome, skipped: bool) {
        if let Ok(mut guard) = self.ended.lock() {
            guard.push((outcome.clone(), skipped));
        }
    }
}

/// Description hook that records step notifications as strings such as
/// `"ask:0"`, `"start:0"`, `"end:0"`.
#[derive(Debug, Default)]
pub struct RecordingDescription {
    declined: HashSet<usize>,
    log: Mutex<Vec<String>>,
}

impl RecordingDescription {
    /// A hook that accepts every step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declines the step at `index`.
    #[must_use]
    pub fn declining(mut self, index: usize) -> Self {
        self.declined.insert(index);
        self
    }

    /// Recorded notifications, in order.
    #[must_use]
    pub fn log(&self) -> Vec<String> {
        self.log.lock().map(|g| g.clone()).unwrap_or_default()
    }

    fn record(&self, entry: String) {
        if let Ok(mut guard) = self.log.lock() {
            guard.push(entry);
        }
    }
}

#[async_trait]
impl DescriptionHook for RecordingDescription {
    async fn ask_whether_request(&self, step: &StepInfo) -> bool {
        self.record(format!("ask:{}", step.index));
        !self.declined.contains(&step.index)
    }

    async fn on_step_start(&self, step: &StepInfo) {
        self.record(format!("start:{}", step.index));
    }

    async fn on_step_end(&self, step: &StepInfo) {
        self.record(format!("end:{}", step.index));
    }
}
