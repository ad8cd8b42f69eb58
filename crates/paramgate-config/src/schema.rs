//! Configuration section types.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_type() -> String {
    "string".to_string()
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_conversion_status() -> u16 {
    400
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Defaults applied to parameter declarations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Type name used by parameters that declare none.
    #[serde(default = "default_type")]
    pub default_type: String,

    /// Separator used by `many` parameters that declare none.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// HTTP status of wrapped conversion failures.
    #[serde(default = "default_conversion_status")]
    pub conversion_status: u16,

    /// Log rejected invocations at debug level.
    #[serde(default = "default_true")]
    pub log_failures: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            default_type: default_type(),
            separator: default_separator(),
            conversion_status: default_conversion_status(),
            log_failures: true,
        }
    }
}

/// Log output format.
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

    /// Filter directive (trace, debug, info, warn, error, or per-target).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

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
            include_location: false,
        }
    }
}

impl From<&LoggingConfig> for paramgate_telemetry::LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            enabled: config.enabled,
            level: config.level.clone(),
            format: match config.format {
                LogFormat::Json => paramgate_telemetry::LogFormat::Json,
                LogFormat::Pretty => paramgate_telemetry::LogFormat::Pretty,
            },
            span_events: false,
            file_line_info: config.include_location,
            include_target: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_config_default() {
        let config = ValidationConfig::default();
        assert_eq!(config.default_type, "string");
        assert_eq!(config.separator, ",");
        assert_eq!(config.conversion_status, 400);
        assert!(config.log_failures);
    }

    #[test]
    fn test_validation_config_partial() {
        let config: ValidationConfig = serde_json::from_str(r#"{"separator": ";"}"#).unwrap();
        assert_eq!(config.separator, ";");
        assert_eq!(config.default_type, "string");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ValidationConfig, _> = serde_json::from_str(r#"{"sep": ";"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_deserialize() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);

        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }

    #[test]
    fn test_logging_into_telemetry() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            ..LoggingConfig::default()
        };

        let log: paramgate_telemetry::LogConfig = (&config).into();
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, paramgate_telemetry::LogFormat::Pretty);
        assert!(log.file_line_info);
    }
}
