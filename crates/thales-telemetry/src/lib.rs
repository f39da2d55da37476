//! Structured logging for Thales services.
//!
//! Thin setup layer over `tracing-subscriber`: JSON output for production,
//! pretty output for development, an `EnvFilter` built from the configured
//! level, and shared field names and macros so request logs look the same
//! everywhere.
//!
//! ```rust,no_run
//! use thales_telemetry::{init_logging, LogConfig};
//!
//! let config = LogConfig::production().with_service_name("tutorial");
//! init_logging(&config).expect("failed to install subscriber");
//!
//! thales_telemetry::log_request_complete!("GET", "/items/5", 200u16, 42u64);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, parse_level, LogConfig};

#[doc(hidden)]
pub use tracing;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
