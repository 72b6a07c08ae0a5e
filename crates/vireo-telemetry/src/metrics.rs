//! Prometheus metrics for Vireo.
//!
//! Recording goes through the `metrics` facade, so the functions here are
//! cheap no-ops until [`init_metrics`] installs the Prometheus recorder.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `vireo_requests_total` | Counter | `controller`, `action` (registered name), `status` | Dispatched requests |
//! | `vireo_request_duration_seconds` | Histogram | `controller` | Run-loop latency |
//! | `vireo_in_flight_requests` | Gauge | - | Requests inside the run-loop |
//! | `vireo_plugin_stops_total` | Counter | `phase` | Plugins that stopped processing |
//! | `vireo_error_dispatches_total` | Counter | `status` | Error controller re-dispatches |

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Name of the request counter.
pub const REQUESTS_TOTAL: &str = "vireo_requests_total";
/// Name of the request duration histogram.
pub const REQUEST_DURATION: &str = "vireo_request_duration_seconds";
/// Name of the in-flight gauge.
pub const IN_FLIGHT: &str = "vireo_in_flight_requests";
/// Name of the plugin stop counter.
pub const PLUGIN_STOPS: &str = "vireo_plugin_stops_total";
/// Name of the error dispatch counter.
pub const ERROR_DISPATCHES: &str = "vireo_error_dispatches_total";

/// Label value used when no route matched.
pub const UNMATCHED: &str = "(unmatched)";
/// Action label used when a route matched but no action handled the request.
pub const UNHANDLED: &str = "(unhandled)";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether the Prometheus exporter is installed.
    pub enabled: bool,

    /// Listen address of the scrape endpoint.
    pub addr: String,

    /// Histogram buckets for request duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: "0.0.0.0:9090".to_string(),
            duration_buckets: vec![
                0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
            ],
        }
    }
}

/// Installs the Prometheus recorder with an HTTP scrape listener.
///
/// Does nothing when metrics are disabled.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidAddress`] for an unparsable address and
/// [`TelemetryError::MetricsInit`] if a recorder is already installed or the
/// buckets are rejected.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION.to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
        .with_http_listener(addr)
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);
    describe_metrics();

    Ok(())
}

/// Renders metrics in Prometheus text format, if the recorder is installed.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Requests processed by the run-loop");
    describe_histogram!(REQUEST_DURATION, "Run-loop duration in seconds");
    describe_gauge!(IN_FLIGHT, "Requests currently inside the run-loop");
    describe_counter!(PLUGIN_STOPS, "Plugins that stopped request processing");
    describe_counter!(ERROR_DISPATCHES, "Requests re-dispatched to the error controller");
}

/// Records a completed request.
///
/// `controller` is [`UNMATCHED`] when no route matched and `action` is
/// [`UNHANDLED`] when no registered action ran. Neither label should carry
/// text taken from the request URL.
pub fn record_request(controller: &str, action: &str, status: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "controller" => controller.to_string(),
        "action" => action.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(REQUEST_DURATION, "controller" => controller.to_string())
        .record(duration.as_secs_f64());
}

/// Records a plugin that stopped processing in `phase` (`"pre"` or `"post"`).
pub fn record_plugin_stop(phase: &'static str) {
    counter!(PLUGIN_STOPS, "phase" => phase).increment(1);
}

/// Records a re-dispatch to the error controller.
pub fn record_error_dispatch(status: u16) {
    counter!(ERROR_DISPATCHES, "status" => status.to_string()).increment(1);
}

/// Keeps the in-flight gauge raised for its lifetime.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(IN_FLIGHT).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(IN_FLIGHT).decrement(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.addr, "0.0.0.0:9090");
        assert!(config.duration_buckets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_disabled_metrics_do_not_install() {
        assert!(init_metrics(&MetricsConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_address() {
        let config = MetricsConfig {
            enabled: true,
            addr: "not an address".to_string(),
            ..MetricsConfig::default()
        };
        assert!(matches!(
            init_metrics(&config),
            Err(TelemetryError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_request("Home", "index", 200, Duration::from_millis(3));
        record_request(UNMATCHED, "", 404, Duration::from_millis(1));
        record_plugin_stop("pre");
        record_error_dispatch(500);
        let guard = InFlightGuard::new();
        drop(guard);
    }
}
