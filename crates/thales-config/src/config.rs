//! Main configuration types.
//!
//! This module provides the top-level [`ThalesConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ExtractConfig, LogFormat, TelemetryConfig};

/// Complete Thales service configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use thales_config::ThalesConfig;
///
/// let config = ThalesConfig::default();
/// assert_eq!(config.extract.max_body_bytes, 1024 * 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ThalesConfig {
    /// Request extraction limits.
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Service identity and logging.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl ThalesConfig {
    /// Create a new configuration builder.
    ///
    /// ```
    /// use thales_config::{ExtractConfig, ThalesConfig};
    ///
    /// let config = ThalesConfig::builder()
    ///     .extract(ExtractConfig {
    ///         max_body_bytes: 512,
    ///         ..Default::default()
    ///     })
    ///     .build();
    ///
    /// assert_eq!(config.extract.max_body_bytes, 512);
    /// ```
    #[must_use]
    pub fn builder() -> ThalesConfigBuilder {
        ThalesConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `extract.max_body_bytes` is zero
    /// - `telemetry.service_name` is empty
    /// - `telemetry.logging.level` is not a level name
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extract.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "extract.max_body_bytes",
                "must be greater than 0",
            ));
        }

        if self.telemetry.service_name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.service_name",
                "must not be empty",
            ));
        }

        thales_telemetry::parse_level(&self.telemetry.logging.level).map_err(|_| {
            ConfigError::invalid_value(
                "telemetry.logging.level",
                format!(
                    "expected one of trace, debug, info, warn, error, off; got {:?}",
                    self.telemetry.logging.level
                ),
            )
        })?;

        Ok(())
    }

    /// Development preset: pretty, colored, debug-level logs with source
    /// locations.
    ///
    /// ```
    /// use thales_config::ThalesConfig;
    ///
    /// let config = ThalesConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.ansi_enabled = true;
        config.telemetry.logging.include_location = true;
        config.telemetry.environment = "development".to_string();

        config
    }

    /// Production preset: JSON logs at info level and strict Content-Type
    /// handling.
    ///
    /// ```
    /// use thales_config::{LogFormat, ThalesConfig};
    ///
    /// let config = ThalesConfig::production();
    /// assert_eq!(config.telemetry.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.logging.ansi_enabled = false;
        config.telemetry.environment = "production".to_string();
        config.extract.strict_content_type = true;

        config
    }
}

/// Builder for [`ThalesConfig`].
#[derive(Debug, Default)]
pub struct ThalesConfigBuilder {
    extract: Option<ExtractConfig>,
    telemetry: Option<TelemetryConfig>,
}

impl ThalesConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extraction configuration.
    #[must_use]
    pub fn extract(mut self, extract: ExtractConfig) -> Self {
        self.extract = Some(extract);
        self
    }

    /// Set the telemetry configuration.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfig) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> ThalesConfig {
        ThalesConfig {
            extract: self.extract.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<ThalesConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoggingConfig;

    #[test]
    fn test_default_config() {
        let config = ThalesConfig::default();
        assert_eq!(config.extract.max_body_bytes, 1024 * 1024);
        assert_eq!(config.telemetry.service_name, "thales-tutorial");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_all_sections() {
        let config = ThalesConfig::builder()
            .extract(ExtractConfig {
                max_body_bytes: 64,
                strict_content_type: true,
            })
            .telemetry(TelemetryConfig {
                service_name: "items".to_string(),
                ..Default::default()
            })
            .build();

        assert_eq!(config.extract.max_body_bytes, 64);
        assert!(config.extract.strict_content_type);
        assert_eq!(config.telemetry.service_name, "items");
    }

    #[test]
    fn test_validate_zero_body_limit() {
        let result = ThalesConfig::builder()
            .extract(ExtractConfig {
                max_body_bytes: 0,
                ..Default::default()
            })
            .build_validated();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("max_body_bytes"));
    }

    #[test]
    fn test_validate_empty_service_name() {
        let config = ThalesConfig::builder()
            .telemetry(TelemetryConfig {
                service_name: "  ".to_string(),
                ..Default::default()
            })
            .build();

        assert!(config.validate().unwrap_err().to_string().contains("service_name"));
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = ThalesConfig::default();
        config.telemetry.logging = LoggingConfig {
            level: "verbose".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("telemetry.logging.level"));

        config.telemetry.logging.level = "WARN".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_development_preset() {
        let config = ThalesConfig::development();
        assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
        assert!(config.telemetry.logging.ansi_enabled);
        assert!(config.telemetry.logging.include_location);
        assert!(!config.extract.strict_content_type);
    }

    #[test]
    fn test_production_preset() {
        let config = ThalesConfig::production();
        assert_eq!(config.telemetry.environment, "production");
        assert!(config.extract.strict_content_type);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip_sections() {
        let toml_str = toml::to_string_pretty(&ThalesConfig::default()).unwrap();
        assert!(toml_str.contains("[extract]"));
        assert!(toml_str.contains("[telemetry.logging]"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let toml_str = r#"
            [server]
            http_addr = "127.0.0.1:8000"
        "#;

        let result: Result<ThalesConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }
}
