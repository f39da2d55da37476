//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: presets, files, and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use serde_json::Value as Json;
use thales_core::parse_bool_token;
use tracing::debug;

use crate::{ConfigError, LogFormat, ThalesConfig};

/// Configuration loader with layered approach.
///
/// Later layers override earlier ones:
/// 1. Defaults or a preset
/// 2. Configuration files and strings (TOML or JSON), deep-merged in the
///    order they are added
/// 3. Environment variables
///
/// # Example
///
/// ```no_run
/// use thales_config::ConfigLoader;
///
/// # fn main() -> Result<(), thales_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("thales.toml")?
///     .with_env_prefix("THALES")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: ThalesConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ThalesConfig::default(),
            env_prefix: None,
        }
    }

    /// Reset to default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = ThalesConfig::default();
        self
    }

    /// Start from the development preset.
    ///
    /// ```
    /// use thales_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = ThalesConfig::development();
        self
    }

    /// Start from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = ThalesConfig::production();
        self
    }

    /// Merge a configuration file over the current values.
    ///
    /// The format is chosen by extension: `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist or cannot be read
    /// - The extension is neither `toml` nor `json`
    /// - The content is invalid or contains unknown fields
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ConfigError::unsupported_format(path.display().to_string()))?;

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        debug!(path = %path.display(), "loading configuration file");
        self.with_string(&content, &format)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Merge configuration content over the current values.
    ///
    /// `format` is `"toml"` or `"json"`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the merged result has
    /// unknown fields or wrongly typed values.
    ///
    /// # Example
    ///
    /// ```
    /// use thales_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [extract]
    ///     max_body_bytes = 4096
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.extract.max_body_bytes, 4096);
    /// assert_eq!(config.telemetry.logging.level, "info");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let layer: Json = match format.to_lowercase().as_str() {
            "toml" => {
                let table: toml::Table = toml::from_str(content)?;
                serde_json::to_value(table)?
            }
            "json" => serde_json::from_str(content)?,
            _ => return Err(ConfigError::unsupported_format(format)),
        };

        let mut merged = serde_json::to_value(&self.config)?;
        merge(&mut merged, layer);
        self.config = serde_json::from_value(merged)?;
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`, e.g.
    /// with prefix "THALES":
    /// - `THALES__EXTRACT__MAX_BODY_BYTES=65536`
    /// - `THALES__TELEMETRY__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file from the current directory or its parents into
    /// the process environment. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if a file exists but is malformed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded dotenv file"),
            Err(err) if err.not_found() => {}
            Err(err) => return Err(err.into()),
        }
        Ok(self)
    }

    /// Load a specific dotenv file into the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if the file is missing or malformed.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref())?;
        Ok(self)
    }

    /// Apply environment overrides (if a prefix was set), validate, and
    /// return the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment value does not parse or the
    /// final configuration is invalid.
    pub fn load(mut self) -> Result<ThalesConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Return the configuration as layered so far, without environment
    /// overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> ThalesConfig {
        self.config
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let mut vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            // Shares the prefix but not the separator, e.g. THALESX__...
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();

        match parts.as_slice() {
            ["EXTRACT", "MAX_BODY_BYTES"] => {
                self.config.extract.max_body_bytes = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            ["EXTRACT", "STRICT_CONTENT_TYPE"] => {
                self.config.extract.strict_content_type = parse_env_bool(key, value)?;
            }

            ["TELEMETRY", "SERVICE_NAME"] => {
                self.config.telemetry.service_name = value.to_string();
            }
            ["TELEMETRY", "ENVIRONMENT"] => {
                self.config.telemetry.environment = value.to_string();
            }

            ["TELEMETRY", "LOGGING", "ENABLED"] => {
                self.config.telemetry.logging.enabled = parse_env_bool(key, value)?;
            }
            ["TELEMETRY", "LOGGING", "LEVEL"] => {
                self.config.telemetry.logging.level = value.to_string();
            }
            ["TELEMETRY", "LOGGING", "FORMAT"] => {
                self.config.telemetry.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["TELEMETRY", "LOGGING", "ANSI_ENABLED"] => {
                self.config.telemetry.logging.ansi_enabled = parse_env_bool(key, value)?;
            }
            ["TELEMETRY", "LOGGING", "INCLUDE_LOCATION"] => {
                self.config.telemetry.logging.include_location = parse_env_bool(key, value)?;
            }

            _ => debug!(var = key, "ignoring unknown configuration variable"),
        }

        Ok(())
    }
}

fn parse_env_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool_token(value).ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))
}

/// Deep-merges `layer` into `base`: objects merge key by key, anything
/// else replaces.
fn merge(base: &mut Json, layer: Json) {
    match (base, layer) {
        (Json::Object(base), Json::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
