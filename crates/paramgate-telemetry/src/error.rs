//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up logging or metrics.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Failed to initialize metrics.
    #[error("Failed to initialize metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::LoggingInit("bad filter".to_string());
        assert_eq!(err.to_string(), "Failed to initialize logging: bad filter");

        let err = TelemetryError::InvalidConfig("format".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: format");
    }
}
