//! Pipeline metrics.
//!
//! Counters are recorded through the `metrics` facade; without an installed
//! recorder they are no-ops. [`init_metrics`] installs a Prometheus recorder
//! whose output is available from [`render_metrics`].
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `paramgate_invocations_total` | Counter | `handler`, `outcome` | Wrapped handler invocations |
//! | `paramgate_validation_failures_total` | Counter | `handler`, `code` | Rejected invocations by error code |

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Invocation counter name.
pub const INVOCATIONS_TOTAL: &str = "paramgate_invocations_total";

/// Validation failure counter name.
pub const VALIDATION_FAILURES_TOTAL: &str = "paramgate_validation_failures_total";

/// How a wrapped handler invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every parameter was extracted and validated; the handler ran.
    Accepted,
    /// A parameter failed conversion or validation.
    Rejected,
    /// No request was available; arguments went straight through.
    PassThrough,
}

impl Outcome {
    /// Label value for the `outcome` label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::PassThrough => "pass_through",
        }
    }
}

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether to install the Prometheus recorder.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Installs the Prometheus recorder and registers metric descriptions.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);
    register_metric_descriptions();

    Ok(())
}

/// Renders metrics in Prometheus format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(INVOCATIONS_TOTAL, "Wrapped handler invocations by outcome");
    describe_counter!(
        VALIDATION_FAILURES_TOTAL,
        "Rejected handler invocations by error code"
    );
}

/// Records one wrapped handler invocation.
pub fn record_invocation(handler: &str, outcome: Outcome) {
    counter!(
        INVOCATIONS_TOTAL,
        "handler" => handler.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Records one rejected invocation.
pub fn record_validation_failure(handler: &str, code: &str) {
    counter!(
        VALIDATION_FAILURES_TOTAL,
        "handler" => handler.to_string(),
        "code" => code.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Accepted.as_str(), "accepted");
        assert_eq!(Outcome::Rejected.as_str(), "rejected");
        assert_eq!(Outcome::PassThrough.as_str(), "pass_through");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_invocation("list_users", Outcome::Accepted);
        record_validation_failure("list_users", "REQUIRED");
    }

    #[test]
    fn test_disabled_metrics() {
        let config = MetricsConfig { enabled: false };
        assert!(init_metrics(&config).is_ok());
        assert!(render_metrics().is_none());
    }
}
