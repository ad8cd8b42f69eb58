//! Logging and metrics for Paramgate.
//!
//! - **Logging**: `tracing-subscriber` setup with JSON or pretty output
//! - **Metrics**: invocation and failure counters via the `metrics` crate
//!
//! The pipeline crates emit `tracing` events and record counters
//! unconditionally; nothing is written until the host calls
//! [`init_telemetry`] (or the individual `init_*` functions).
//!
//! # Example
//!
//! ```rust,ignore
//! use paramgate_telemetry::{init_telemetry, LogConfig, MetricsConfig};
//!
//! init_telemetry(&LogConfig::production(), &MetricsConfig::default())?;
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use metrics::{init_metrics, render_metrics, MetricsConfig, Outcome};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(logging: &LogConfig, metrics: &MetricsConfig) -> TelemetryResult<()> {
    init_logging(logging)?;
    init_metrics(metrics)?;
    Ok(())
}
