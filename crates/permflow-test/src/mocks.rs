//! Mock implementations for testing.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use permflow_core::{Capability, CapabilityName, GrantOracle, SettingsTarget};
use permflow_runtime::{Host, HostError, HostEvents, PromptRequest};

/// Mock implementation of the `GrantOracle` trait.
///
/// Grant and rationale state live behind shared `std::sync::Mutex`es, so a
/// clone handed to a requester observes changes made through the original
/// (or through a [`MockHost`] answering prompts).
#[derive(Debug, Clone, Default)]
pub struct MockOracle {
    granted: Arc<Mutex<HashSet<CapabilityName>>>,
    rationale: Arc<Mutex<HashSet<CapabilityName>>>,
}

impl MockOracle {
    /// An oracle with nothing granted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `names` up front.
    #[must_use]
    pub fn with_granted<I, N>(self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CapabilityName>,
    {
        self.grant_all(names);
        self
    }

    /// Grants one capability.
    pub fn grant(&self, name: impl Into<CapabilityName>) {
        if let Ok(mut guard) = self.granted.lock() {
            guard.insert(name.into());
        }
    }

    /// Grants every capability in `names`.
    pub fn grant_all<I, N>(&self, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<CapabilityName>,
    {
        if let Ok(mut guard) = self.granted.lock() {
            guard.extend(names.into_iter().map(Into::into));
        }
    }

    /// Revokes one capability.
    pub fn revoke(&self, name: &str) {
        if let Ok(mut guard) = self.granted.lock() {
            guard.remove(name);
        }
    }

    /// Sets whether the OS would show a rationale for `name`.
    pub fn set_rationale(&self, name: impl Into<CapabilityName>, show: bool) {
        if let Ok(mut guard) = self.rationale.lock() {
            let name = name.into();
            if show {
                guard.insert(name);
            } else {
                guard.remove(&name);
            }
        }
    }

    /// Raw grant state, without version gating.
    #[must_use]
    pub fn is_marked_granted(&self, name: &str) -> bool {
        self.granted
            .lock()
            .map(|guard| guard.contains(name))
            .unwrap_or(false)
    }
}

impl GrantOracle for MockOracle {
    fn is_granted(&self, capability: &Capability) -> bool {
        self.is_marked_granted(capability.name().as_str())
    }

    fn should_show_rationale(&self, capability: &Capability) -> bool {
        self.rationale
            .lock()
            .map(|guard| guard.contains(capability.name().as_str()))
            .unwrap_or(false)
    }
}

/// How a [`MockHost`] answers an interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// Grant everything prompted for.
    GrantAll,
    /// Deny everything prompted for.
    DenyAll,
    /// Deny everything and leave a rationale available.
    DenyWithRationale,
    /// Grant only these capabilities.
    Grant(Vec<CapabilityName>),
    /// First answer with a stale request code, then grant everything.
    StaleThenGrantAll,
    /// Never answer.
    Silent,
}

/// A call the orchestrator made on a [`MockHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `attach`
    Attach,
    /// `request_prompt`
    Prompt(PromptRequest),
    /// `navigate`
    Navigate {
        /// Target opened.
        target: SettingsTarget,
        /// Capabilities the page was opened for.
        capabilities: Vec<CapabilityName>,
    },
    /// `detach`
    Detach,
}

#[derive(Debug)]
struct MockHostState {
    events: Option<HostEvents>,
    destroyed: bool,
    auto_resume: bool,
    prompt_responses: VecDeque<PromptResponse>,
    default_prompt: PromptResponse,
    settings_grants: bool,
    failing_targets: Vec<SettingsTarget>,
    attach_error: Option<HostError>,
    prompt_error: Option<HostError>,
    calls: Vec<HostCall>,
}

#[derive(Debug)]
struct MockHostInner {
    id: String,
    oracle: MockOracle,
    state: Mutex<MockHostState>,
}

/// Scripted implementation of the `Host` trait.
///
/// Answers prompts from a queue of [`PromptResponse`]s (falling back to a
/// default), applies the answers to its [`MockOracle`], resumes on attach
/// and on return from settings, and records every call.
#[derive(Debug, Clone)]
pub struct MockHost {
    inner: Arc<MockHostInner>,
}

impl MockHost {
    /// A host answering prompts with [`PromptResponse::DenyAll`].
    #[must_use]
    pub fn new(id: impl Into<String>, oracle: &MockOracle) -> Self {
        Self {
            inner: Arc::new(MockHostInner {
                id: id.into(),
                oracle: oracle.clone(),
                state: Mutex::new(MockHostState {
                    events: None,
                    destroyed: false,
                    auto_resume: true,
                    prompt_responses: VecDeque::new(),
                    default_prompt: PromptResponse::DenyAll,
                    settings_grants: true,
                    failing_targets: Vec::new(),
                    attach_error: None,
                    prompt_error: None,
                    calls: Vec::new(),
                }),
            }),
        }
    }

    /// Queues a prompt answer.
    #[must_use]
    pub fn with_prompt_response(self, response: PromptResponse) -> Self {
        self.with_state(|s| s.prompt_responses.push_back(response));
        self
    }

    /// Sets the answer used when the queue is empty.
    #[must_use]
    pub fn with_default_prompt(self, response: PromptResponse) -> Self {
        self.with_state(|s| s.default_prompt = response);
        self
    }

    /// Whether returning from settings grants the capabilities (default
    /// `true`).
    #[must_use]
    pub fn with_settings_grants(self, grants: bool) -> Self {
        self.with_state(|s| s.settings_grants = grants);
        self
    }

    /// Makes navigation to `target` fail.
    #[must_use]
    pub fn with_failing_target(self, target: SettingsTarget) -> Self {
        self.with_state(|s| s.failing_targets.push(target));
        self
    }

    /// Makes `attach` fail.
    #[must_use]
    pub fn with_attach_error(self, error: HostError) -> Self {
        self.with_state(|s| s.attach_error = Some(error));
        self
    }

    /// Makes `request_prompt` fail.
    #[must_use]
    pub fn with_prompt_error(self, error: HostError) -> Self {
        self.with_state(|s| s.prompt_error = Some(error));
        self
    }

    /// Do not resume automatically on attach; call [`MockHost::resume`].
    #[must_use]
    pub fn without_auto_resume(self) -> Self {
        self.with_state(|s| s.auto_resume = false);
        self
    }

    /// Marks the host destroyed before any cycle starts.
    #[must_use]
    pub fn already_destroyed(self) -> Self {
        self.with_state(|s| s.destroyed = true);
        self
    }

    /// A trait object sharing this host's state.
    #[must_use]
    pub fn shared(&self) -> Arc<dyn Host> {
        Arc::new(self.clone())
    }

    /// Reports a resume to the attached cycle.
    pub fn resume(&self) -> bool {
        self.events().is_some_and(|events| events.resumed())
    }

    /// Destroys the host. The destroy report reaches the cycle before the
    /// destroyed flag is visible.
    pub fn destroy(&self) {
        let events = self
            .inner
            .state
            .lock()
            .ok()
            .and_then(|mut s| s.events.take());
        if let Some(events) = events {
            events.destroyed();
        }
        self.with_state(|s| s.destroyed = true);
    }

    /// The event sender of the attached cycle, if any.
    #[must_use]
    pub fn events(&self) -> Option<HostEvents> {
        self.inner
            .state
            .lock()
            .ok()
            .and_then(|s| s.events.clone())
    }

    /// Every call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<HostCall> {
        self.inner
            .state
            .lock()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    /// Prompts shown so far.
    #[must_use]
    pub fn prompts(&self) -> Vec<PromptRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Prompt(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Prompts plus navigations.
    #[must_use]
    pub fn dispatch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, HostCall::Prompt(_) | HostCall::Navigate { .. }))
            .count()
    }

    /// Whether `attach` was ever called.
    #[must_use]
    pub fn was_attached(&self) -> bool {
        self.calls().contains(&HostCall::Attach)
    }

    fn with_state(&self, f: impl FnOnce(&mut MockHostState)) {
        if let Ok(mut guard) = self.inner.state.lock() {
            f(&mut guard);
        }
    }

    fn answer_prompt(&self, events: &HostEvents, request: &PromptRequest, response: PromptResponse) {
        let code = request.request_code;
        match response {
            PromptResponse::GrantAll => {
                events.prompt_result(code, self.answer(request, |_| true));
            },
            PromptResponse::DenyAll => {
                events.prompt_result(code, self.answer(request, |_| false));
            },
            PromptResponse::DenyWithRationale => {
                for name in &request.capabilities {
                    self.inner.oracle.set_rationale(name, true);
                }
                events.prompt_result(code, self.answer(request, |_| false));
            },
            PromptResponse::Grant(list) => {
                events.prompt_result(code, self.answer(request, |name| list.contains(name)));
            },
            PromptResponse::StaleThenGrantAll => {
                events.prompt_result(code.wrapping_add(1), self.answer(request, |_| false));
                events.prompt_result(code, self.answer(request, |_| true));
            },
            PromptResponse::Silent => {},
        }
    }

    /// Applies `granted` to the oracle and reports the resulting state.
    fn answer(
        &self,
        request: &PromptRequest,
        granted: impl Fn(&CapabilityName) -> bool,
    ) -> Vec<(CapabilityName, bool)> {
        let oracle = &self.inner.oracle;
        for name in &request.capabilities {
            if granted(name) {
                oracle.grant(name);
            }
        }
        request
            .capabilities
            .iter()
            .map(|name| (name.clone(), oracle.is_marked_granted(name.as_str())))
            .collect()
    }
}

impl Host for MockHost {
    fn id(&self) -> &str {
        &self.inner.id
    }

    fn attach(&self, events: HostEvents) -> Result<(), HostError> {
        let mut guard = self
            .inner
            .state
            .lock()
            .map_err(|_| HostError::DispatchFailed("mock host poisoned".to_string()))?;
        guard.calls.push(HostCall::Attach);
        if guard.destroyed {
            return Err(HostError::Destroyed);
        }
        if let Some(error) = guard.attach_error.clone() {
            return Err(error);
        }
        if guard.auto_resume {
            events.attached();
            events.resumed();
        }
        guard.events = Some(events);
        Ok(())
    }

    fn request_prompt(&self, request: PromptRequest) -> Result<(), HostError> {
        let (events, response) = {
            let mut guard = self
                .inner
                .state
                .lock()
                .map_err(|_| HostError::DispatchFailed("mock host poisoned".to_string()))?;
            guard.calls.push(HostCall::Prompt(request.clone()));
            if guard.destroyed {
                return Err(HostError::Destroyed);
            }
            if let Some(error) = guard.prompt_error.clone() {
                return Err(error);
            }
            let response = guard
                .prompt_responses
                .pop_front()
                .unwrap_or_else(|| guard.default_prompt.clone());
            (guard.events.clone(), response)
        };
        if let Some(events) = events {
            self.answer_prompt(&events, &request, response);
        }
        Ok(())
    }

    fn navigate(
        &self,
        target: &SettingsTarget,
        capabilities: &[CapabilityName],
    ) -> Result<(), HostError> {
        let (events, grants) = {
            let mut guard = self
                .inner
                .state
                .lock()
                .map_err(|_| HostError::DispatchFailed("mock host poisoned".to_string()))?;
            guard.calls.push(HostCall::Navigate {
                target: target.clone(),
                capabilities: capabilities.to_vec(),
            });
            if guard.destroyed {
                return Err(HostError::Destroyed);
            }
            if guard.failing_targets.contains(target) {
                return Err(HostError::NavigationFailed {
                    target: format!("{target:?}"),
                    reason: "activity not found".to_string(),
                });
            }
            (guard.events.clone(), guard.settings_grants)
        };
        if grants {
            self.inner.oracle.grant_all(capabilities);
        }
        if let Some(events) = events {
            events.resumed();
        }
        Ok(())
    }

    fn detach(&self) {
        self.with_state(|s| {
            s.calls.push(HostCall::Detach);
            s.events = None;
        });
    }

    fn is_destroyed(&self) -> bool {
        self.inner.state.lock().map(|s| s.destroyed).unwrap_or(true)
    }
}
