//! Caller-facing API.
//!
//! [`PermissionRequester::request`] runs every synchronous check (unknown
//! names, normalization, manifest compliance, the already-granted short
//! circuit, the one-cycle-per-host rule) before a host binding exists, then
//! spawns the cycle on the current tokio runtime.

use std::sync::Arc;

use permflow_core::{
    CapabilityName, CapabilityRegistry, CompatibilityResolver, DispatchChannelRouter, GrantCheck,
    GrantOracle, Outcome, RequestSet, SettingsTarget, best_settings_targets,
};
use permflow_manifest::{ManifestComplianceChecker, ManifestInfo};
use permflow_telemetry::RequestContext;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::active::ActiveHosts;
use crate::error::{HostError, RuntimeError, RuntimeResult};
use crate::hooks::{DescriptionHook, RequestInterceptor};
use crate::host::Host;
use crate::orchestrator::{CycleParts, RequestOrchestrator};
use crate::request_code::RequestCodeAllocator;
use crate::settings::RuntimeSettings;
use crate::state::CycleState;
use crate::tracker::{DoNotAskAgain, RequestedTracker};

/// Observes a running cycle.
#[derive(Debug, Clone)]
pub struct CycleHandle {
    cycle_id: Uuid,
    state: watch::Receiver<CycleState>,
}

impl CycleHandle {
    fn delivered(cycle_id: Uuid) -> Self {
        let (_tx, state) = watch::channel(CycleState::Delivered);
        Self { cycle_id, state }
    }

    /// Correlation id of the cycle.
    #[must_use]
    pub fn cycle_id(&self) -> Uuid {
        self.cycle_id
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CycleState {
        *self.state.borrow()
    }

    /// Whether the cycle finished.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Waits until the cycle is [`Delivered`](CycleState::Delivered) or
    /// [`Abandoned`](CycleState::Abandoned).
    pub async fn wait_terminal(&self) -> CycleState {
        let mut state = self.state.clone();
        let done = match state.wait_for(|s| s.is_terminal()).await {
            Ok(current) => Some(*current),
            Err(_) => None,
        };
        done.unwrap_or_else(|| *state.borrow())
    }
}

/// Starts request cycles and answers grant queries.
pub struct PermissionRequester {
    registry: Arc<CapabilityRegistry>,
    oracle: Arc<dyn GrantOracle>,
    settings: RuntimeSettings,
    manifest: Option<Arc<ManifestInfo>>,
    interceptor: Option<Arc<dyn RequestInterceptor>>,
    description: Option<Arc<dyn DescriptionHook>>,
    tracker: Arc<RequestedTracker>,
    active: Arc<ActiveHosts>,
}

impl std::fmt::Debug for PermissionRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionRequester")
            .field("os_version", &self.registry.os_version())
            .field("settings", &self.settings)
            .field("has_manifest", &self.manifest.is_some())
            .finish_non_exhaustive()
    }
}

impl PermissionRequester {
    /// Creates a requester over `registry`, querying `oracle`.
    #[must_use]
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        oracle: Arc<dyn GrantOracle>,
        settings: RuntimeSettings,
    ) -> Self {
        Self {
            registry,
            oracle,
            settings,
            manifest: None,
            interceptor: None,
            description: None,
            tracker: Arc::new(RequestedTracker::new()),
            active: Arc::new(ActiveHosts::default()),
        }
    }

    /// Validates requests against `manifest` before dispatch.
    #[must_use]
    pub fn with_manifest(mut self, manifest: ManifestInfo) -> Self {
        self.manifest = Some(Arc::new(manifest));
        self
    }

    /// Installs a cycle interceptor.
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// Installs a step description hook.
    #[must_use]
    pub fn with_description(mut self, description: Arc<dyn DescriptionHook>) -> Self {
        self.description = Some(description);
        self
    }

    /// Shares an already-requested tracker, e.g. across requesters.
    #[must_use]
    pub fn with_tracker(mut self, tracker: Arc<RequestedTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// The resolved registry.
    #[must_use]
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// The already-requested tracker.
    #[must_use]
    pub fn tracker(&self) -> &Arc<RequestedTracker> {
        &self.tracker
    }

    /// Starts a cycle for `capabilities` on `host`.
    ///
    /// Returns immediately. `callback` fires exactly once with the outcome,
    /// or never if the host is destroyed first. When every capability is
    /// already granted the callback fires before this returns and no host
    /// binding is created.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::EmptyRequest`] for an empty set
    /// - [`RuntimeError::UnknownCapability`] for names not in the registry
    /// - [`RuntimeError::Compliance`] when the manifest does not cover the
    ///   normalized set
    /// - [`RuntimeError::CycleInFlight`] when `host` already runs a cycle
    /// - [`RuntimeError::NoRuntime`] outside a tokio runtime
    pub fn request<I, N, F>(
        &self,
        capabilities: I,
        host: Arc<dyn Host>,
        callback: F,
    ) -> RuntimeResult<CycleHandle>
    where
        I: IntoIterator<Item = N>,
        N: Into<CapabilityName>,
        F: FnOnce(Outcome) + Send + 'static,
    {
        let requested: RequestSet = capabilities.into_iter().collect();
        if requested.is_empty() {
            return Err(RuntimeError::EmptyRequest);
        }
        if let Some(unknown) = requested
            .iter()
            .find(|name| !self.registry.contains(name.as_str()))
        {
            return Err(RuntimeError::UnknownCapability {
                name: unknown.to_string(),
            });
        }

        let normalized = CompatibilityResolver::new(&self.registry).normalize(&requested);
        self.check_compliance(&normalized)?;

        let context = RequestContext::new("permission_requester")
            .with_host(host.id())
            .with_operation("request");
        let cycle_id = context.cycle_id;

        if self.check().is_granted_all(&requested) {
            debug!(%cycle_id, "Every capability already granted, delivering immediately");
            callback(Outcome::all_granted(&requested));
            return Ok(CycleHandle::delivered(cycle_id));
        }

        let Some(guard) = self.active.try_acquire(host.id(), cycle_id) else {
            return Err(RuntimeError::CycleInFlight {
                host_id: host.id().to_string(),
            });
        };
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| RuntimeError::NoRuntime)?;

        let plan = DispatchChannelRouter::new(&self.registry).plan(&normalized);
        info!(
            %cycle_id,
            host_id = host.id(),
            steps = plan.len(),
            "Spawning request cycle"
        );

        let parts = CycleParts {
            context,
            registry: Arc::clone(&self.registry),
            oracle: Arc::clone(&self.oracle),
            settings: self.settings,
            host,
            requested,
            normalized,
            plan,
            tracker: Arc::clone(&self.tracker),
            codes: RequestCodeAllocator::global(),
            interceptor: self.interceptor.clone(),
            description: self.description.clone(),
            guard,
        };
        let (orchestrator, state) = RequestOrchestrator::new(parts, callback);
        runtime.spawn(orchestrator.run());

        Ok(CycleHandle { cycle_id, state })
    }

    /// Like [`request`](Self::request), delivering through a oneshot.
    ///
    /// The receiver errors if the cycle is abandoned.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub fn request_outcome<I, N>(
        &self,
        capabilities: I,
        host: Arc<dyn Host>,
    ) -> RuntimeResult<(CycleHandle, oneshot::Receiver<Outcome>)>
    where
        I: IntoIterator<Item = N>,
        N: Into<CapabilityName>,
    {
        let (tx, rx) = oneshot::channel();
        let handle = self.request(capabilities, host, move |outcome| {
            let _ = tx.send(outcome);
        })?;
        Ok((handle, rx))
    }

    /// Opens the best settings page for `capabilities` without starting a
    /// cycle. Returns the target that opened.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::UnknownCapability`] for unregistered names, or the
    /// last [`HostError`] if no candidate target could be opened.
    pub fn open_settings(
        &self,
        host: &dyn Host,
        capabilities: &[CapabilityName],
    ) -> RuntimeResult<SettingsTarget> {
        if let Some(unknown) = capabilities
            .iter()
            .find(|name| !self.registry.contains(name.as_str()))
        {
            return Err(RuntimeError::UnknownCapability {
                name: unknown.to_string(),
            });
        }

        let mut last_error = HostError::NavigationFailed {
            target: "none".to_string(),
            reason: "no candidate settings target".to_string(),
        };
        for target in best_settings_targets(&self.registry, capabilities) {
            match host.navigate(&target, capabilities) {
                Ok(()) => return Ok(target),
                Err(HostError::Destroyed) => return Err(HostError::Destroyed.into()),
                Err(e) => {
                    warn!(target = ?target, error = %e, "Settings navigation failed, trying next target");
                    last_error = e;
                },
            }
        }
        Err(last_error.into())
    }

    /// Whether a cycle is running on `host_id`.
    #[must_use]
    pub fn is_busy(&self, host_id: &str) -> bool {
        self.active.is_active(host_id)
    }

    /// Whether `name` is granted.
    #[must_use]
    pub fn is_granted(&self, name: &str) -> bool {
        self.check().is_granted(name)
    }

    /// Whether every name is granted. Empty input is never granted.
    #[must_use]
    pub fn is_granted_all<'n, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'n CapabilityName>,
    {
        self.check().is_granted_all(names)
    }

    /// Granted subset of `names`.
    #[must_use]
    pub fn granted<'n, I>(&self, names: I) -> Vec<CapabilityName>
    where
        I: IntoIterator<Item = &'n CapabilityName>,
    {
        self.check().granted(names)
    }

    /// Denied subset of `names`.
    #[must_use]
    pub fn denied<'n, I>(&self, names: I) -> Vec<CapabilityName>
    where
        I: IntoIterator<Item = &'n CapabilityName>,
    {
        self.check().denied(names)
    }

    /// Whether `name` looks permanently denied. Best effort.
    #[must_use]
    pub fn is_do_not_ask_again(&self, name: &str) -> bool {
        DoNotAskAgain::new(self.check(), &self.tracker).is_do_not_ask_again(name)
    }

    /// Whether any of `names` looks permanently denied.
    #[must_use]
    pub fn is_do_not_ask_again_any<'n, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'n CapabilityName>,
    {
        DoNotAskAgain::new(self.check(), &self.tracker).is_do_not_ask_again_any(names)
    }

    fn check(&self) -> GrantCheck<'_> {
        GrantCheck::new(&self.registry, self.oracle.as_ref())
    }

    fn check_compliance(&self, normalized: &RequestSet) -> RuntimeResult<()> {
        let Some(manifest) = &self.manifest else {
            return Ok(());
        };
        // Normalization may retire every name on this OS.
        if normalized.is_empty() {
            return Ok(());
        }
        ManifestComplianceChecker::new(&self.registry, manifest)
            .enabled(self.settings.compliance_enabled)
            .validate(normalized)?;
        Ok(())
    }
}
