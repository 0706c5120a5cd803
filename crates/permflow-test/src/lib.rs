//! Permflow Test - Shared test utilities.
//!
//! This crate provides a scripted [`MockHost`], a mutable [`MockOracle`],
//! recording hooks and fixtures, for use as a dev-dependency.
//!
//! # Usage
//!
//! ```rust,ignore
//! use permflow_test::{MockHost, MockOracle, PromptResponse, test_requester};
//! use permflow_core::{OsVersion, names};
//!
//! #[tokio::test(start_paused = true)]
//! async fn test_camera_flow() {
//!     let oracle = MockOracle::new();
//!     let requester = test_requester(OsVersion::ANDROID_13, &oracle);
//!     let host = MockHost::new("main", &oracle).with_prompt_response(PromptResponse::GrantAll);
//!
//!     let (handle, outcome) = requester.request_outcome([names::CAMERA], host.shared()).unwrap();
//!     handle.wait_terminal().await;
//!     assert!(outcome.await.unwrap().is_all_granted());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
