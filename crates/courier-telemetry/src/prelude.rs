//! Commonly used types for convenient import.
//!
//! ```rust,no_run
//! use courier_telemetry::prelude::*;
//!
//! # fn main() -> TelemetryResult<()> {
//! setup_logging(&LogConfig::new("debug").with_format(LogFormat::Compact))?;
//!
//! let _guard = RunGuard::new(RunContext::new("upload plan"));
//! tracing::info!("Planning uploads");
//! # Ok(())
//! # }
//! ```

// Errors
pub use crate::{TelemetryError, TelemetryResult};

// Logging configuration
pub use crate::{FileRotation, LogConfig, LogFormat, LogTarget};

// Setup functions
pub use crate::{setup_default_logging, setup_logging};

// Run context
pub use crate::{RunContext, RunGuard};
