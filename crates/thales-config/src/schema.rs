//! Configuration schema types.
//!
//! Each section rejects unknown keys, and every key has a default so a
//! file only names what it changes.

use serde::{Deserialize, Serialize};
use thales_extract::{ExtractOptions, DEFAULT_MAX_BODY_BYTES};
use thales_telemetry::LogConfig;

/// Request extraction section.
///
/// ```
/// use thales_config::ExtractConfig;
///
/// let options = ExtractConfig {
///     max_body_bytes: 4096,
///     strict_content_type: true,
/// }
/// .to_options();
///
/// assert_eq!(options.max_body_bytes, 4096);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Reject bodies whose Content-Type is neither JSON nor a URL-encoded
    /// form with 415 instead of ignoring them.
    #[serde(default)]
    pub strict_content_type: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
            strict_content_type: false,
        }
    }
}

impl ExtractConfig {
    /// Converts the section into extraction options.
    #[must_use]
    pub fn to_options(&self) -> ExtractOptions {
        ExtractOptions {
            max_body_bytes: self.max_body_bytes,
            strict_content_type: self.strict_content_type,
        }
    }
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level (trace, debug, info, warn, error, off).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Builds the subscriber settings for `thales-telemetry`.
    ///
    /// The format picks the base preset; the remaining keys override it.
    #[must_use]
    pub fn to_log_config(&self, service_name: &str) -> LogConfig {
        let base = match self.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            ansi: self.ansi_enabled,
            file_line_info: self.include_location,
            ..base
        }
        .with_service_name(service_name)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telemetry configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Service name attached to log output.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Deployment environment (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            environment: default_environment(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TelemetryConfig {
    /// Shorthand for `self.logging.to_log_config(&self.service_name)`.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        self.logging.to_log_config(&self.service_name)
    }
}

fn default_service_name() -> String {
    "thales-tutorial".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_true() -> bool {
    true
}
