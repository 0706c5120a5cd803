//! The request cycle state machine.
//!
//! One [`RequestOrchestrator`] drives exactly one cycle as a single task:
//!
//! 1. ask the interceptor whether to run at all
//! 2. attach the host and wait until it resumes
//! 3. run every [`DispatchStep`] in plan order, waiting for the prompt
//!    result or the return from settings, then the step's result wait
//! 4. settle, classify the original request, detach
//! 5. fire the delivery slot
//!
//! Every wait also listens for host events. A destroy report, or every
//! event sender being dropped, abandons the cycle wherever it is.

use std::sync::Arc;
use std::time::Duration;

use permflow_core::{
    CapabilityName, CapabilityRegistry, Channel, DispatchPlan, DispatchStep, GrantCheck,
    GrantOracle, Outcome, RequestSet, ResultAggregator, best_settings_targets,
};
use permflow_telemetry::RequestContext;
use tokio::sync::{mpsc, watch};
use tracing::{Instrument, debug, info, trace, warn};

use crate::active::ActiveHostGuard;
use crate::delivery::DeliverySlot;
use crate::error::HostError;
use crate::events::{HostEvent, HostEvents};
use crate::hooks::{CycleInfo, DescriptionHook, InterceptDecision, RequestInterceptor, StepInfo};
use crate::host::{Host, PromptRequest};
use crate::request_code::RequestCodeAllocator;
use crate::settings::RuntimeSettings;
use crate::state::CycleState;
use crate::tracker::RequestedTracker;

/// The host went away before delivery.
struct Abandoned;

type StepResult<T = ()> = Result<T, Abandoned>;

/// Everything a cycle needs, assembled by the requester.
pub(crate) struct CycleParts {
    pub(crate) context: RequestContext,
    pub(crate) registry: Arc<CapabilityRegistry>,
    pub(crate) oracle: Arc<dyn GrantOracle>,
    pub(crate) settings: RuntimeSettings,
    pub(crate) host: Arc<dyn Host>,
    pub(crate) requested: RequestSet,
    pub(crate) normalized: RequestSet,
    pub(crate) plan: DispatchPlan,
    pub(crate) tracker: Arc<RequestedTracker>,
    pub(crate) codes: &'static RequestCodeAllocator,
    pub(crate) interceptor: Option<Arc<dyn RequestInterceptor>>,
    pub(crate) description: Option<Arc<dyn DescriptionHook>>,
    pub(crate) guard: ActiveHostGuard,
}

/// Drives one request cycle from attach to delivery.
pub(crate) struct RequestOrchestrator {
    context: RequestContext,
    registry: Arc<CapabilityRegistry>,
    oracle: Arc<dyn GrantOracle>,
    settings: RuntimeSettings,
    host: Arc<dyn Host>,
    requested: RequestSet,
    normalized: RequestSet,
    plan: DispatchPlan,
    tracker: Arc<RequestedTracker>,
    codes: &'static RequestCodeAllocator,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
    description: Option<Arc<dyn DescriptionHook>>,
    guard: Option<ActiveHostGuard>,
    slot: Arc<DeliverySlot>,
    host_events: Option<HostEvents>,
    events: mpsc::UnboundedReceiver<HostEvent>,
    state: watch::Sender<CycleState>,
    attached: bool,
}

impl RequestOrchestrator {
    /// Creates the orchestrator and the receiver its handle watches.
    pub(crate) fn new<F>(parts: CycleParts, callback: F) -> (Self, watch::Receiver<CycleState>)
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        let slot = Arc::new(DeliverySlot::new(callback));
        let (tx, events) = mpsc::unbounded_channel();
        let (state, state_rx) = watch::channel(CycleState::Idle);

        let orchestrator = Self {
            context: parts.context,
            registry: parts.registry,
            oracle: parts.oracle,
            settings: parts.settings,
            host: parts.host,
            requested: parts.requested,
            normalized: parts.normalized,
            plan: parts.plan,
            tracker: parts.tracker,
            codes: parts.codes,
            interceptor: parts.interceptor,
            description: parts.description,
            guard: Some(parts.guard),
            host_events: Some(HostEvents::new(tx, Arc::clone(&slot))),
            slot,
            events,
            state,
            attached: false,
        };
        (orchestrator, state_rx)
    }

    /// Runs the cycle to a terminal state.
    pub(crate) async fn run(self) -> CycleState {
        let span = self.context.span();
        self.execute().instrument(span).await
    }

    async fn execute(mut self) -> CycleState {
        let info = self.cycle_info();
        info!(
            steps = self.plan.len(),
            capabilities = ?info.requested,
            "Request cycle started"
        );

        let interceptor = self.interceptor.clone();
        let skipped = match &interceptor {
            Some(interceptor) => {
                interceptor.on_request_start(&info).await == InterceptDecision::Skip
            },
            None => false,
        };

        let result = if skipped {
            info!("Interceptor skipped the cycle");
            Ok(self.classify())
        } else {
            self.drive().await
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(Abandoned) => return self.abandon(),
        };
        // Skipped and unattached cycles never see a destroy event.
        if self.host.is_destroyed() {
            return self.abandon();
        }

        self.release_host();
        if !self.slot.deliver(outcome.clone()) {
            return self.abandon();
        }
        self.transition(CycleState::Delivered);
        info!(
            granted = outcome.granted().len(),
            denied = outcome.denied().len(),
            elapsed_ms = self.context.elapsed_ms(),
            "Request cycle delivered"
        );

        if let Some(interceptor) = &interceptor {
            interceptor.on_request_end(&info, &outcome, skipped).await;
        }
        CycleState::Delivered
    }

    async fn drive(&mut self) -> StepResult<Outcome> {
        if !self.attach().await? {
            return Ok(self.classify());
        }

        let steps = self.plan.steps().to_vec();
        for (index, step) in steps.iter().enumerate() {
            self.run_step(index, step).await?;
        }

        self.transition(CycleState::Classifying);
        self.pause(self.settings.settle_delay).await?;
        let outcome = self.classify();

        self.transition(CycleState::Detaching);
        self.detach();
        self.drain_pending()?;
        if self.host.is_destroyed() {
            return Err(Abandoned);
        }
        Ok(outcome)
    }

    /// Attaches the host. `Ok(false)` means the host refused for a reason
    /// other than destruction and nothing can be dispatched.
    async fn attach(&mut self) -> StepResult<bool> {
        self.transition(CycleState::Attaching);
        if self.host.is_destroyed() {
            debug!("Host already destroyed at attach");
            return Err(Abandoned);
        }
        let Some(events) = self.host_events.take() else {
            return Ok(false);
        };

        match self.host.attach(events) {
            Ok(()) => {},
            Err(HostError::Destroyed) => return Err(Abandoned),
            Err(e) => {
                warn!(error = %e, "Host attach failed, classifying without dispatch");
                return Ok(false);
            },
        }
        self.attached = true;

        loop {
            match self.next_event().await? {
                HostEvent::Resumed => return Ok(true),
                HostEvent::Attached => trace!("Host attached"),
                other => trace!(event = ?other, "Ignoring event before resume"),
            }
        }
    }

    async fn run_step(&mut self, index: usize, step: &DispatchStep) -> StepResult {
        self.transition(CycleState::Dispatching { step: index });

        // Earlier steps or the user may have granted part of this step.
        let pending = self.check().denied(step.capabilities());
        if pending.is_empty() {
            debug!(step = index, "Step already granted, skipping");
            return Ok(());
        }
        if step.is_background() && !self.foreground_ready(step) {
            debug!(step = index, "No foreground companion granted, skipping background step");
            return Ok(());
        }

        let info = StepInfo {
            cycle_id: self.context.cycle_id,
            index,
            channel: step.channel(),
            capabilities: pending.clone(),
        };
        let description = self.description.clone();
        if let Some(hook) = &description
            && !hook.ask_whether_request(&info).await
        {
            debug!(step = index, "Description hook declined step");
            return Ok(());
        }

        if index > 0 && step.channel() == Channel::InteractivePrompt {
            let interval = step
                .request_interval()
                .min(self.settings.max_request_interval);
            self.pause(interval).await?;
        }

        if let Some(hook) = &description {
            hook.on_step_start(&info).await;
        }
        match step.channel() {
            Channel::InteractivePrompt => self.dispatch_prompt(index, &pending).await?,
            Channel::SettingsNavigation => self.dispatch_settings(index, &pending).await?,
        }

        let wait = step.result_wait().min(self.settings.max_result_wait);
        self.pause(wait).await?;

        if let Some(hook) = &description {
            hook.on_step_end(&info).await;
        }
        Ok(())
    }

    async fn dispatch_prompt(&mut self, index: usize, pending: &[CapabilityName]) -> StepResult {
        let request_code = self.codes.next_code();
        debug!(
            step = index,
            request_code,
            capabilities = ?pending,
            "Dispatching prompt"
        );
        let request = PromptRequest {
            request_code,
            capabilities: pending.to_vec(),
        };

        match self.host.request_prompt(request) {
            Ok(()) => self.tracker.mark(pending),
            Err(HostError::Destroyed) => return Err(Abandoned),
            Err(e) => {
                warn!(step = index, error = %e, "Prompt dispatch failed, resolving step");
                return Ok(());
            },
        }

        self.transition(CycleState::AwaitingResult { step: index });
        loop {
            match self.next_event().await? {
                HostEvent::PromptResult {
                    request_code: code,
                    results,
                } if code == request_code => {
                    debug!(step = index, results = results.len(), "Prompt answered");
                    return Ok(());
                },
                HostEvent::PromptResult {
                    request_code: code,
                    ..
                } => {
                    debug!(
                        expected = request_code,
                        received = code,
                        "Ignoring result with mismatched request code"
                    );
                },
                other => trace!(event = ?other, "Ignoring event while awaiting prompt"),
            }
        }
    }

    async fn dispatch_settings(&mut self, index: usize, pending: &[CapabilityName]) -> StepResult {
        let targets = best_settings_targets(&self.registry, pending);
        for target in &targets {
            debug!(step = index, target = ?target, "Navigating to settings");
            match self.host.navigate(target, pending) {
                Ok(()) => {
                    self.tracker.mark(pending);
                    self.transition(CycleState::AwaitingResult { step: index });
                    return self.wait_for_resume().await;
                },
                Err(HostError::Destroyed) => return Err(Abandoned),
                Err(e) => {
                    warn!(step = index, target = ?target, error = %e, "Settings navigation failed, trying next target");
                },
            }
        }
        warn!(step = index, "No settings target could be opened, resolving step");
        Ok(())
    }

    async fn wait_for_resume(&mut self) -> StepResult {
        loop {
            match self.next_event().await? {
                HostEvent::Resumed => return Ok(()),
                other => trace!(event = ?other, "Ignoring event while awaiting return"),
            }
        }
    }

    async fn next_event(&mut self) -> StepResult<HostEvent> {
        match self.events.recv().await {
            Some(HostEvent::Destroyed) | None => Err(Abandoned),
            Some(event) => Ok(event),
        }
    }

    /// Sleeps for `duration` while watching for destruction.
    async fn pause(&mut self, duration: Duration) -> StepResult {
        if !self.attached {
            tokio::time::sleep(duration).await;
            return Ok(());
        }
        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                biased;
                event = self.events.recv() => match event {
                    Some(HostEvent::Destroyed) | None => return Err(Abandoned),
                    Some(other) => trace!(event = ?other, "Ignoring event during pause"),
                },
                () = &mut sleep => return Ok(()),
            }
        }
    }

    /// Consumes events queued before detach.
    fn drain_pending(&mut self) -> StepResult {
        while let Ok(event) = self.events.try_recv() {
            if event == HostEvent::Destroyed {
                return Err(Abandoned);
            }
        }
        Ok(())
    }

    fn foreground_ready(&self, step: &DispatchStep) -> bool {
        let check = self.check();
        step.capabilities()
            .iter()
            .filter_map(|name| self.registry.get(name.as_str()))
            .all(|capability| check.any_companion_granted(capability))
    }

    fn classify(&self) -> Outcome {
        ResultAggregator::classify(&self.requested, &self.check())
    }

    fn check(&self) -> GrantCheck<'_> {
        GrantCheck::new(&self.registry, self.oracle.as_ref())
    }

    fn detach(&mut self) {
        if self.attached {
            self.host.detach();
            self.attached = false;
        }
    }

    fn release_host(&mut self) {
        self.guard = None;
    }

    fn abandon(mut self) -> CycleState {
        self.slot.disarm();
        self.detach();
        self.release_host();
        self.transition(CycleState::Abandoned);
        warn!(
            elapsed_ms = self.context.elapsed_ms(),
            "Host destroyed before delivery, cycle abandoned"
        );
        CycleState::Abandoned
    }

    fn transition(&self, next: CycleState) {
        let previous = self.state.send_replace(next);
        debug!(from = %previous, to = %next, "Cycle state changed");
    }

    fn cycle_info(&self) -> CycleInfo {
        CycleInfo {
            cycle_id: self.context.cycle_id,
            host_id: self.host.id().to_string(),
            requested: self.requested.as_slice().to_vec(),
            normalized: self.normalized.as_slice().to_vec(),
        }
    }
}
