//! Prelude module - commonly used test utilities.
//!
//! Use `use permflow_test::prelude::*;` to import all essential helpers.

// Mocks
pub use crate::{HostCall, MockHost, MockOracle, PromptResponse};

// Hooks and capture
pub use crate::{OutcomeCapture, RecordingDescription, RecordingInterceptor};

// Fixtures
pub use crate::{declared_all, init_test_logging, test_registry, test_requester};
