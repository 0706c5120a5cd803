//! Dispatch planning.
//!
//! The router turns a normalized [`RequestSet`] into an ordered list of
//! steps. Each step is one OS interaction: a single interactive prompt or a
//! single settings navigation.
//!
//! Grouping rules:
//! - interactive capabilities sharing a prompt group form one step, with
//!   background capabilities split into their own step since the OS rejects
//!   them in the same prompt as their foreground companions
//! - ungrouped interactive capabilities are prompted one per step
//! - every settings-navigation capability joins a single navigation step
//!
//! Steps are ordered by the first capability that opened them.

use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::capability::{CapabilityName, Channel};
use crate::registry::CapabilityRegistry;
use crate::request_set::RequestSet;

/// One OS interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchStep {
    channel: Channel,
    group: Option<String>,
    background: bool,
    capabilities: Vec<CapabilityName>,
    request_interval: Duration,
    result_wait: Duration,
}

impl DispatchStep {
    /// Dispatch channel.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Prompt group shared by the step's capabilities, if any.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Whether the step holds background capabilities.
    #[must_use]
    pub fn is_background(&self) -> bool {
        self.background
    }

    /// Capabilities dispatched together.
    #[must_use]
    pub fn capabilities(&self) -> &[CapabilityName] {
        &self.capabilities
    }

    /// Largest request interval among the step's capabilities.
    #[must_use]
    pub fn request_interval(&self) -> Duration {
        self.request_interval
    }

    /// Largest result wait among the step's capabilities.
    #[must_use]
    pub fn result_wait(&self) -> Duration {
        self.result_wait
    }
}

/// Ordered dispatch steps for one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchPlan {
    steps: Vec<DispatchStep>,
}

impl DispatchPlan {
    /// Steps in dispatch order.
    #[must_use]
    pub fn steps(&self) -> &[DispatchStep] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether there is nothing to dispatch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Consumes the plan.
    #[must_use]
    pub fn into_steps(self) -> Vec<DispatchStep> {
        self.steps
    }
}

#[derive(PartialEq, Eq)]
enum StepKey {
    Group(String, bool),
    Settings,
}

/// Partitions normalized sets into dispatch steps.
#[derive(Debug, Clone, Copy)]
pub struct DispatchChannelRouter<'a> {
    registry: &'a CapabilityRegistry,
}

impl<'a> DispatchChannelRouter<'a> {
    /// Creates a router over `registry`.
    #[must_use]
    pub fn new(registry: &'a CapabilityRegistry) -> Self {
        Self { registry }
    }

    /// Builds the dispatch plan for an already normalized set.
    #[must_use]
    pub fn plan(&self, normalized: &RequestSet) -> DispatchPlan {
        let mut steps: Vec<DispatchStep> = Vec::new();
        let mut keys: Vec<Option<StepKey>> = Vec::new();

        for name in normalized {
            let Some(capability) = self.registry.get(name.as_str()) else {
                warn!(capability = %name, "Skipping unregistered capability in dispatch plan");
                continue;
            };

            let key = match (capability.channel(), capability.group()) {
                (Channel::SettingsNavigation, _) => Some(StepKey::Settings),
                (Channel::InteractivePrompt, Some(group)) => Some(StepKey::Group(
                    group.to_string(),
                    capability.is_background(),
                )),
                (Channel::InteractivePrompt, None) => None,
            };

            let existing = key
                .as_ref()
                .and_then(|key| keys.iter().position(|k| k.as_ref() == Some(key)));

            if let Some(at) = existing {
                let step = &mut steps[at];
                step.capabilities.push(name.clone());
                step.request_interval = step.request_interval.max(capability.request_interval());
                step.result_wait = step.result_wait.max(capability.result_wait());
            } else {
                steps.push(DispatchStep {
                    channel: capability.channel(),
                    group: capability.group().map(str::to_string),
                    background: capability.is_background(),
                    capabilities: vec![name.clone()],
                    request_interval: capability.request_interval(),
                    result_wait: capability.result_wait(),
                });
                keys.push(key);
            }
        }

        DispatchPlan { steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, names};
    use crate::compat::CompatibilityResolver;
    use crate::version::OsVersion;

    fn plan(os: OsVersion, requested: &[&str]) -> DispatchPlan {
        let registry = Catalog::builtin().resolve(os).unwrap();
        let normalized = CompatibilityResolver::new(&registry)
            .normalize(&RequestSet::from_iter(requested.iter().copied()));
        DispatchChannelRouter::new(&registry).plan(&normalized)
    }

    fn step_names(step: &DispatchStep) -> Vec<&str> {
        step.capabilities().iter().map(CapabilityName::as_str).collect()
    }

    #[test]
    fn test_background_location_two_steps() {
        let plan = plan(OsVersion::ANDROID_12, &[names::ACCESS_BACKGROUND_LOCATION]);
        assert_eq!(plan.len(), 2);

        let first = &plan.steps()[0];
        assert_eq!(first.channel(), Channel::InteractivePrompt);
        assert!(!first.is_background());
        assert_eq!(
            step_names(first),
            [names::ACCESS_FINE_LOCATION, names::ACCESS_COARSE_LOCATION]
        );

        let second = &plan.steps()[1];
        assert_eq!(second.channel(), Channel::InteractivePrompt);
        assert!(second.is_background());
        assert_eq!(step_names(second), [names::ACCESS_BACKGROUND_LOCATION]);
        assert_eq!(second.request_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_group_mates_merge_into_first_seen_step() {
        let plan = plan(
            OsVersion::ANDROID_13,
            &[names::READ_CONTACTS, names::CAMERA, names::WRITE_CONTACTS],
        );
        assert_eq!(plan.len(), 2);
        assert_eq!(
            step_names(&plan.steps()[0]),
            [names::READ_CONTACTS, names::WRITE_CONTACTS]
        );
        assert_eq!(step_names(&plan.steps()[1]), [names::CAMERA]);
    }

    #[test]
    fn test_ungrouped_capabilities_prompt_separately() {
        let plan = plan(OsVersion::ANDROID_13, &[names::CAMERA, names::RECORD_AUDIO]);
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_settings_capabilities_share_one_step() {
        let plan = plan(
            OsVersion::ANDROID_13,
            &[
                names::SYSTEM_ALERT_WINDOW,
                names::CAMERA,
                names::WRITE_SETTINGS,
            ],
        );
        assert_eq!(plan.len(), 2);

        let settings = &plan.steps()[0];
        assert_eq!(settings.channel(), Channel::SettingsNavigation);
        assert_eq!(
            step_names(settings),
            [names::SYSTEM_ALERT_WINDOW, names::WRITE_SETTINGS]
        );
        assert_eq!(settings.result_wait(), Duration::from_millis(200));
        assert_eq!(step_names(&plan.steps()[1]), [names::CAMERA]);
    }

    #[test]
    fn test_unknown_names_are_skipped() {
        let plan = plan(OsVersion::ANDROID_13, &["custom.unknown", names::CAMERA]);
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_empty_set_empty_plan() {
        assert!(plan(OsVersion::ANDROID_13, &[]).is_empty());
    }
}
