//! Structured logging for Thales.
//!
//! Libraries in the workspace only emit `tracing` events; a binary or test
//! installs the subscriber once through [`init_logging`].
//!
//! # Example
//!
//! ```rust,no_run
//! use thales_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).unwrap();
//! tracing::info!(http.method = "GET", http.path = "/items/5", "Processing request");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g. "info", "thales_core=trace,info").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to use ANSI colors in human-readable output.
    pub ansi: bool,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Service name for log fields.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            ansi: true,
            span_events: true,
            file_line_info: true,
            thread_ids: false,
            include_target: true,
            service_name: "thales".to_string(),
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            ansi: false,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
            service_name: "thales".to_string(),
        }
    }

    /// Sets the service name.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }
}

/// Initializes the global logging subscriber.
///
/// Does nothing when logging is disabled.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` for an unparseable level and
/// `TelemetryError::LoggingInit` if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(config.ansi)
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::info!(
        service.name = %config.service_name,
        level = %config.level,
        json = config.json_format,
        "logging initialized"
    );

    Ok(())
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if the directive is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })
}

/// Parses a bare level name (`trace`, `debug`, `info`, `warn`, `error`,
/// `off`), ignoring case.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` for anything else.
pub fn parse_level(level: &str) -> TelemetryResult<LevelFilter> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|e| TelemetryError::InvalidFilter {
            filter: level.to_string(),
            reason: e.to_string(),
        })
}

/// Standard log field names.
pub mod fields {
    /// HTTP method field name.
    pub const HTTP_METHOD: &str = "http.method";

    /// HTTP path field name.
    pub const HTTP_PATH: &str = "http.path";

    /// HTTP status code field name.
    pub const HTTP_STATUS: &str = "http.status_code";

    /// Handler (schema) name field name.
    pub const HANDLER: &str = "handler";

    /// Validation failure count field name.
    pub const FAILURES: &str = "failures";

    /// Duration field name (in microseconds).
    pub const DURATION_US: &str = "duration_us";

    /// Service name field name.
    pub const SERVICE_NAME: &str = "service.name";
}

/// Logs a request completion event.
#[macro_export]
macro_rules! log_request_complete {
    ($method:expr, $path:expr, $status:expr, $duration_us:expr) => {
        $crate::tracing::info!(
            http.method = %$method,
            http.path = %$path,
            http.status_code = $status,
            duration_us = $duration_us,
            "Request completed"
        );
    };
}

/// Logs a request rejected by validation.
#[macro_export]
macro_rules! log_request_rejected {
    ($handler:expr, $status:expr, $failures:expr) => {
        $crate::tracing::debug!(
            handler = %$handler,
            http.status_code = $status,
            failures = $failures,
            "Request rejected"
        );
    };
}
