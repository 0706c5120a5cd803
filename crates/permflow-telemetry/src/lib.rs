//! Permflow Telemetry - Logging and per-cycle tracing.
//!
//! This crate provides:
//! - Subscriber setup with selectable format and target
//! - [`RequestContext`] spans correlating everything logged during one
//!   request cycle
//!
//! # Example
//!
//! ```rust,no_run
//! use permflow_telemetry::{LogConfig, LogFormat, RequestContext, setup_logging};
//!
//! # fn main() -> Result<(), permflow_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("permflow_runtime=debug");
//! setup_logging(&config)?;
//!
//! let ctx = RequestContext::new("permission_requester").with_host("main");
//! let _entered = ctx.span().entered();
//! tracing::info!("Starting cycle");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod logging;

pub use context::{RequestContext, RequestGuard};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
