//! Permflow Runtime - Lifecycle-bound permission request cycles.
//!
//! This crate drives the asynchronous half of a permission request:
//!
//! - [`PermissionRequester`] validates a request synchronously, then spawns
//!   one cycle per host
//! - the cycle attaches a [`Host`], dispatches every step of the
//!   [`DispatchPlan`](permflow_core::DispatchPlan) through an interactive
//!   prompt or a settings page, and waits for the OS between steps
//! - the caller's callback fires exactly once with the
//!   [`Outcome`](permflow_core::Outcome), or never if the host is destroyed
//!   first
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use permflow_core::{Catalog, OsVersion, names};
//! use permflow_runtime::{PermissionRequester, RuntimeSettings};
//!
//! let registry = Arc::new(Catalog::builtin().resolve(OsVersion::ANDROID_13)?);
//! let requester = PermissionRequester::new(registry, oracle, RuntimeSettings::default());
//!
//! let handle = requester.request([names::CAMERA], host, |outcome| {
//!     println!("granted: {:?}", outcome.granted());
//! })?;
//! handle.wait_terminal().await;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod active;
mod delivery;
mod error;
mod events;
mod hooks;
mod host;
mod orchestrator;
mod request_code;
mod requester;
mod settings;
mod state;
mod tracker;

pub use delivery::DeliverySlot;
pub use error::{HostError, RuntimeError, RuntimeResult};
pub use events::{HostEvent, HostEvents};
pub use hooks::{CycleInfo, DescriptionHook, InterceptDecision, RequestInterceptor, StepInfo};
pub use host::{Host, PromptRequest};
pub use request_code::RequestCodeAllocator;
pub use requester::{CycleHandle, PermissionRequester};
pub use settings::RuntimeSettings;
pub use state::CycleState;
pub use tracker::{DoNotAskAgain, RequestedTracker};
