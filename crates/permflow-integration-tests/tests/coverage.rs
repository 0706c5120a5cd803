//! Outcomes partition exactly what was asked for, whatever the host does.

use permflow_core::{OsVersion, RequestSet, names};
use permflow_runtime::CycleState;
use permflow_test::{MockHost, MockOracle, OutcomeCapture, PromptResponse, test_requester};
use rand::Rng;
use rand::seq::SliceRandom;

const POOL: &[&str] = &[
    names::CAMERA,
    names::RECORD_AUDIO,
    names::READ_CONTACTS,
    names::WRITE_CONTACTS,
    names::READ_CALENDAR,
    names::ACCESS_FINE_LOCATION,
    names::ACCESS_COARSE_LOCATION,
    names::ACCESS_BACKGROUND_LOCATION,
    names::READ_MEDIA_IMAGES,
    names::READ_PHONE_NUMBERS,
    names::SEND_SMS,
    names::SYSTEM_ALERT_WINDOW,
    names::WRITE_SETTINGS,
];

const VERSIONS: &[OsVersion] = &[
    OsVersion::ANDROID_7,
    OsVersion::ANDROID_10,
    OsVersion::ANDROID_12,
    OsVersion::ANDROID_13,
];

#[tokio::test(start_paused = true)]
async fn test_outcome_covers_random_requests() {
    let mut rng = rand::thread_rng();

    for round in 0..200 {
        let os = *VERSIONS.choose(&mut rng).unwrap();
        let oracle = MockOracle::new();
        let requester = test_requester(os, &oracle);

        // Duplicates are deliberate; the set collapses them.
        let size = rng.gen_range(1..=6);
        let picked: Vec<&str> = (0..size)
            .map(|_| *POOL.choose(&mut rng).unwrap())
            .collect();
        for name in &picked {
            if rng.gen_bool(0.2) {
                oracle.grant(*name);
            }
        }

        let response = if rng.gen_bool(0.5) {
            PromptResponse::GrantAll
        } else {
            PromptResponse::DenyAll
        };
        let host = MockHost::new(format!("host-{round}"), &oracle)
            .with_default_prompt(response)
            .with_settings_grants(rng.gen_bool(0.5));

        let capture = OutcomeCapture::new();
        let handle = requester
            .request(picked.iter().copied(), host.shared(), capture.callback())
            .unwrap();
        assert_eq!(handle.wait_terminal().await, CycleState::Delivered);

        let requested: RequestSet = picked.iter().copied().collect();
        let outcome = capture.last().unwrap();
        assert_eq!(capture.count(), 1, "round {round}");
        assert!(
            outcome.covers(&requested),
            "round {round} on {os}: {outcome:?} does not cover {requested:?}"
        );

        // Request order is preserved within each side.
        let order = |side: &[permflow_core::CapabilityName]| {
            side.iter()
                .map(|name| requested.position(name.as_str()))
                .collect::<Vec<_>>()
        };
        let granted = order(outcome.granted());
        assert!(granted.windows(2).all(|w| w[0] < w[1]), "round {round}");
        let denied = order(outcome.denied());
        assert!(denied.windows(2).all(|w| w[0] < w[1]), "round {round}");

        // Grant state agrees with the requester's own queries.
        for name in outcome.granted() {
            assert!(requester.is_granted(name.as_str()), "round {round}: {name}");
        }
        for name in outcome.denied() {
            assert!(!requester.is_granted(name.as_str()), "round {round}: {name}");
        }
    }
}
