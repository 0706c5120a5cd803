//! Interceptor and description hooks around a live cycle.

mod common;

use std::sync::Arc;

use common::{CycleHarness, strs};
use permflow_core::{OsVersion, names};
use permflow_runtime::{CycleState, HostError};
use permflow_test::{MockHost, PromptResponse, RecordingDescription, RecordingInterceptor};

#[tokio::test(start_paused = true)]
async fn test_interceptor_sees_requested_and_normalized_sets() {
    let interceptor = Arc::new(RecordingInterceptor::new());
    let harness = CycleHarness::new(OsVersion::ANDROID_12)
        .with_host(|h| h.with_default_prompt(PromptResponse::GrantAll))
        .with_requester(|r| r.with_interceptor(interceptor.clone()));

    let (state, outcome) = harness.run(&[names::ACCESS_BACKGROUND_LOCATION]).await;
    assert_eq!(state, CycleState::Delivered);

    let started = interceptor.started();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].host_id, "host-1");
    assert_eq!(strs(&started[0].requested), [names::ACCESS_BACKGROUND_LOCATION]);
    assert_eq!(
        strs(&started[0].normalized),
        [
            names::ACCESS_FINE_LOCATION,
            names::ACCESS_COARSE_LOCATION,
            names::ACCESS_BACKGROUND_LOCATION,
        ]
    );

    let ended = interceptor.ended();
    assert_eq!(ended.len(), 1);
    assert_eq!(Some(&ended[0].0), outcome.as_ref());
    assert!(!ended[0].1);
}

#[tokio::test(start_paused = true)]
async fn test_interceptor_skip_classifies_without_host() {
    let interceptor = Arc::new(RecordingInterceptor::skipping());
    let harness = CycleHarness::new(OsVersion::ANDROID_13)
        .with_requester(|r| r.with_interceptor(interceptor.clone()));
    harness.oracle.grant(names::CAMERA);

    let (state, outcome) = harness
        .run(&[names::CAMERA, names::RECORD_AUDIO])
        .await;

    assert_eq!(state, CycleState::Delivered);
    assert!(harness.host.calls().is_empty());

    let outcome = outcome.unwrap();
    assert_eq!(strs(outcome.granted()), [names::CAMERA]);
    assert_eq!(strs(outcome.denied()), [names::RECORD_AUDIO]);

    let ended = interceptor.ended();
    assert_eq!(ended.len(), 1);
    assert!(ended[0].1);
}

#[tokio::test(start_paused = true)]
async fn test_skipped_cycle_on_destroyed_host_is_abandoned() {
    let interceptor = Arc::new(RecordingInterceptor::skipping());
    let harness = CycleHarness::new(OsVersion::ANDROID_13)
        .with_host(MockHost::already_destroyed)
        .with_requester(|r| r.with_interceptor(interceptor.clone()));

    let (state, outcome) = harness.run(&[names::CAMERA]).await;

    assert_eq!(state, CycleState::Abandoned);
    assert!(outcome.is_none());
    assert_eq!(harness.capture.count(), 0);
    assert!(harness.host.calls().is_empty());
    assert!(interceptor.ended().is_empty());
    assert!(!harness.requester.is_busy("host-1"));
}

#[tokio::test(start_paused = true)]
async fn test_description_hook_brackets_each_step() {
    let description = Arc::new(RecordingDescription::new());
    let harness = CycleHarness::new(OsVersion::ANDROID_13)
        .with_requester(|r| r.with_description(description.clone()));

    harness.run(&[names::CAMERA, names::RECORD_AUDIO]).await;

    assert_eq!(
        description.log(),
        ["ask:0", "start:0", "end:0", "ask:1", "start:1", "end:1"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_declined_step_is_not_dispatched() {
    let description = Arc::new(RecordingDescription::new().declining(0));
    let harness = CycleHarness::new(OsVersion::ANDROID_13)
        .with_host(|h| h.with_default_prompt(PromptResponse::GrantAll))
        .with_requester(|r| r.with_description(description.clone()));

    let (state, outcome) = harness.run(&[names::CAMERA, names::RECORD_AUDIO]).await;

    assert_eq!(state, CycleState::Delivered);
    let prompts = harness.host.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(strs(&prompts[0].capabilities), [names::RECORD_AUDIO]);
    assert_eq!(description.log(), ["ask:0", "ask:1", "start:1", "end:1"]);

    let outcome = outcome.unwrap();
    assert_eq!(strs(outcome.granted()), [names::RECORD_AUDIO]);
    assert_eq!(strs(outcome.denied()), [names::CAMERA]);
}

#[tokio::test(start_paused = true)]
async fn test_dispatched_steps_mark_tracker() {
    let harness = CycleHarness::new(OsVersion::ANDROID_13).with_host(|h| {
        h.with_default_prompt(PromptResponse::DenyAll)
    });

    harness.run(&[names::CAMERA]).await;

    let tracker = harness.requester.tracker();
    assert!(tracker.was_requested(names::CAMERA));
    assert!(!tracker.was_requested(names::RECORD_AUDIO));
    // Denied without a rationale after being asked: do not ask again.
    assert!(harness.requester.is_do_not_ask_again(names::CAMERA));
}

#[tokio::test(start_paused = true)]
async fn test_failed_prompt_does_not_mark_tracker() {
    let harness = CycleHarness::new(OsVersion::ANDROID_13).with_host(|h| {
        h.with_prompt_error(HostError::DispatchFailed("no activity".to_string()))
    });

    let (state, _) = harness.run(&[names::CAMERA]).await;

    assert_eq!(state, CycleState::Delivered);
    assert_eq!(harness.host.prompts().len(), 1);
    assert!(!harness.requester.tracker().was_requested(names::CAMERA));
    assert!(!harness.requester.is_do_not_ask_again(names::CAMERA));
}

#[tokio::test(start_paused = true)]
async fn test_rationale_keeps_capability_askable() {
    let harness = CycleHarness::new(OsVersion::ANDROID_13)
        .with_host(|h| h.with_default_prompt(PromptResponse::DenyWithRationale));

    harness.run(&[names::CAMERA]).await;

    assert!(harness.requester.tracker().was_requested(names::CAMERA));
    assert!(!harness.requester.is_do_not_ask_again(names::CAMERA));
}
