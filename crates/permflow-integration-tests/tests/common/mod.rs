//! Shared harness for request-cycle integration tests.

use std::time::Duration;

use permflow_core::{CapabilityName, OsVersion, Outcome};
use permflow_runtime::{CycleHandle, CycleState, PermissionRequester};
use permflow_test::{MockHost, MockOracle, OutcomeCapture, test_requester};

/// One requester, one oracle and one host wired together.
#[allow(dead_code)]
pub struct CycleHarness {
    /// Shared grant state.
    pub oracle: MockOracle,
    /// The requester under test.
    pub requester: PermissionRequester,
    /// The scripted host.
    pub host: MockHost,
    /// Every outcome delivered so far.
    pub capture: OutcomeCapture,
}

#[allow(dead_code)]
impl CycleHarness {
    /// A harness on `os` whose host denies every prompt.
    pub fn new(os: OsVersion) -> Self {
        let oracle = MockOracle::new();
        let requester = test_requester(os, &oracle);
        let host = MockHost::new("host-1", &oracle);
        Self {
            oracle,
            requester,
            host,
            capture: OutcomeCapture::new(),
        }
    }

    /// Replaces the host, keeping the oracle.
    pub fn with_host(mut self, configure: impl FnOnce(MockHost) -> MockHost) -> Self {
        self.host = configure(self.host);
        self
    }

    /// Replaces the requester, keeping the oracle.
    pub fn with_requester(
        mut self,
        configure: impl FnOnce(PermissionRequester) -> PermissionRequester,
    ) -> Self {
        self.requester = configure(self.requester);
        self
    }

    /// Starts a cycle that records into `capture`.
    pub fn start(&self, capabilities: &[&str]) -> CycleHandle {
        self.requester
            .request(
                capabilities.iter().copied(),
                self.host.shared(),
                self.capture.callback(),
            )
            .unwrap()
    }

    /// Starts a cycle and waits for it to finish.
    pub async fn run(&self, capabilities: &[&str]) -> (CycleState, Option<Outcome>) {
        let handle = self.start(capabilities);
        let state = handle.wait_terminal().await;
        (state, self.capture.last())
    }
}

/// Lets spawned cycles run until they block on the host.
#[allow(dead_code)]
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Names as plain strings, for compact assertions.
#[allow(dead_code)]
pub fn strs(names: &[CapabilityName]) -> Vec<&str> {
    names.iter().map(CapabilityName::as_str).collect()
}
