//! Typed configuration for Thales services.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides (`PREFIX__SECTION__KEY`)
//! - Strict validation (unknown fields are rejected)
//! - Layered loading (defaults or preset → files → env)
//!
//! [`ThalesConfig`] has two sections:
//!
//! - [`ExtractConfig`]: request body limit and Content-Type strictness
//! - [`TelemetryConfig`]: service name, environment and [`LoggingConfig`]
//!
//! # Example
//!
//! ```no_run
//! use thales_config::ConfigLoader;
//!
//! # fn main() -> Result<(), thales_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("thales.toml")?
//!     .with_env_prefix("THALES")
//!     .load()?;
//!
//! let options = config.extract.to_options();
//! let logging = config.telemetry.to_log_config();
//! # let _ = (options, logging);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [extract]
//! max_body_bytes = 1048576
//! strict_content_type = false
//!
//! [telemetry]
//! service_name = "thales-tutorial"
//! environment = "production"
//!
//! [telemetry.logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ansi_enabled = false
//! include_location = false
//! ```

#![doc(html_root_url = "https://docs.rs/thales-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{ThalesConfig, ThalesConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{ExtractConfig, LogFormat, LoggingConfig, TelemetryConfig};
