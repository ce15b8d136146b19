//! Courier Test - shared test utilities for courier.
//!
//! This crate provides an in-memory environment, fixtures, and a temporary
//! workspace harness that can be used across courier crates as a
//! dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! courier-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use courier_test::{MockEnv, test_context_with};
//!
//! #[test]
//! fn test_host_from_env() {
//!     let env = MockEnv::new().with_var("SSH_HOST", "a.example.com");
//!     let ctx = test_context_with(env.clone());
//!     // ... resolve against ctx, then inspect env.lookups()
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
