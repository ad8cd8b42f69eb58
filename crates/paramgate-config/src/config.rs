//! Root configuration type.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingConfig, ValidationConfig};

/// Complete Paramgate configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use paramgate_config::ParamgateConfig;
///
/// let config = ParamgateConfig::default();
/// assert_eq!(config.validation.separator, ",");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ParamgateConfig {
    /// Parameter declaration defaults.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ParamgateConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `validation.default_type` or `validation.separator` is empty
    /// - `validation.conversion_status` is not a 4xx or 5xx status
    /// - `logging.level` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validation.default_type.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "validation.default_type",
                "must not be empty",
            ));
        }

        if self.validation.separator.is_empty() {
            return Err(ConfigError::invalid_value(
                "validation.separator",
                "must not be empty",
            ));
        }

        if !(400..=599).contains(&self.validation.conversion_status) {
            return Err(ConfigError::invalid_value(
                "validation.conversion_status",
                format!(
                    "must be a client or server error status, got {}",
                    self.validation.conversion_status
                ),
            ));
        }

        if self.logging.enabled && self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        Ok(())
    }

    /// Debug-level, human-readable logging.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config
    }

    /// Info-level JSON logging; failure logging off.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.validation.log_failures = false;
        config
    }
}
