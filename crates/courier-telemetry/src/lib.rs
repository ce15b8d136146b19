//! Courier Telemetry - logging and tracing for courier runs.
//!
//! This crate provides:
//! - Configurable logging setup with multiple formats and targets
//! - A run context that ties every log line of one invocation together
//!
//! # Example
//!
//! ```rust,no_run
//! use courier_telemetry::{LogConfig, LogFormat, RunContext, RunGuard, setup_logging};
//!
//! # fn main() -> Result<(), courier_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Pretty)
//!     .with_directive("courier_config=debug");
//!
//! setup_logging(&config)?;
//!
//! let ctx = RunContext::new("config show").with_project("app", "1.0.0");
//! let _guard = RunGuard::new(ctx);
//! tracing::info!("Rendering configuration");
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

pub use context::{RunContext, RunGuard};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
