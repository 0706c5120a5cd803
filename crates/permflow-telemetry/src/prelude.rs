//! Prelude module - commonly used types for convenient import.
//!
//! Use `use permflow_telemetry::prelude::*;` to import all essential types.

// Errors
pub use crate::{TelemetryError, TelemetryResult};

// Logging
pub use crate::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};

// Context
pub use crate::{RequestContext, RequestGuard};
