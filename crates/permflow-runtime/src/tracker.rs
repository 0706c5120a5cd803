//! Already-requested tracking and the "do not ask again" heuristic.
//!
//! The OS gives no direct signal for "denied permanently". It is inferred
//! from three signals: the capability was dispatched at least once in this
//! process, it is currently denied, and the OS no longer offers a
//! rationale. A capability that was never dispatched in this process, or a
//! prompt dismissed without an explicit deny, yields a false negative. That
//! is accepted as best-effort behavior.

use dashmap::DashSet;
use permflow_core::{CapabilityName, GrantCheck};
use tracing::trace;

/// Process-scoped set of capabilities dispatched at least once.
///
/// Append-only; readers tolerate staleness.
#[derive(Debug, Default)]
pub struct RequestedTracker {
    requested: DashSet<CapabilityName>,
}

impl RequestedTracker {
    /// An empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `names` as dispatched.
    pub fn mark<'n, I>(&self, names: I)
    where
        I: IntoIterator<Item = &'n CapabilityName>,
    {
        for name in names {
            if self.requested.insert(name.clone()) {
                trace!(capability = %name, "First dispatch this process");
            }
        }
    }

    /// Whether `name` was dispatched at least once.
    #[must_use]
    pub fn was_requested(&self, name: &str) -> bool {
        self.requested.contains(name)
    }

    /// Number of distinct capabilities dispatched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requested.len()
    }

    /// Whether nothing was dispatched yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requested.is_empty()
    }
}

/// Evaluates the "do not ask again" heuristic.
#[derive(Debug, Clone, Copy)]
pub struct DoNotAskAgain<'a> {
    check: GrantCheck<'a>,
    tracker: &'a RequestedTracker,
}

impl<'a> DoNotAskAgain<'a> {
    /// Creates an evaluator.
    #[must_use]
    pub fn new(check: GrantCheck<'a>, tracker: &'a RequestedTracker) -> Self {
        Self { check, tracker }
    }

    /// Whether `name` looks permanently denied.
    #[must_use]
    pub fn is_do_not_ask_again(&self, name: &str) -> bool {
        let Some(capability) = self.check.registry().get(name) else {
            return false;
        };
        if !capability.kind().supports_do_not_ask_again() {
            return false;
        }
        if !capability.is_supported() {
            return capability
                .legacy_equivalents()
                .iter()
                .any(|legacy| self.is_do_not_ask_again(legacy.as_str()));
        }
        if capability.is_background() && !self.check.any_companion_granted(capability) {
            return capability
                .foreground_companions()
                .iter()
                .all(|companion| self.is_do_not_ask_again(companion.as_str()));
        }
        self.tracker.was_requested(name)
            && !self.check.is_capability_granted(capability)
            && !self.check.should_show_rationale(name)
    }

    /// Whether any of `names` looks permanently denied.
    #[must_use]
    pub fn is_do_not_ask_again_any<'n, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'n CapabilityName>,
    {
        names
            .into_iter()
            .any(|name| self.is_do_not_ask_again(name.as_str()))
    }
}
