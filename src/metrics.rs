// Prometheus metrics definitions for the gonawin backend.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Gauges ───────────────────────────────────────────────────────

    /// Tasks waiting in the in-process queue.
    pub static ref TASK_QUEUE_DEPTH: IntGauge =
        IntGauge::new("gonawin_task_queue_depth", "Tasks waiting in the queue").unwrap();

    // ── Counters ─────────────────────────────────────────────────────

    /// Predictions saved, by kind (create, update).
    pub static ref PREDICTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("gonawin_predictions_total", "Predictions saved"),
        &["kind"],
    )
    .unwrap();

    pub static ref MATCH_RESULTS_TOTAL: IntCounter = IntCounter::new(
        "gonawin_match_results_total",
        "Match results set",
    )
    .unwrap();

    pub static ref PHASES_ADVANCED_TOTAL: IntCounter = IntCounter::new(
        "gonawin_phases_advanced_total",
        "Tournament phases whose successors were resolved",
    )
    .unwrap();

    pub static ref INVITES_SENT_TOTAL: IntCounter = IntCounter::new(
        "gonawin_invites_sent_total",
        "Invite mails sent",
    )
    .unwrap();

    /// Searches run, by entity kind.
    pub static ref SEARCHES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("gonawin_searches_total", "Searches run"),
        &["kind"],
    )
    .unwrap();

    /// Tasks processed by the worker, by task kind and outcome.
    pub static ref TASKS_PROCESSED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("gonawin_tasks_processed_total", "Tasks processed"),
        &["task", "outcome"],
    )
    .unwrap();

    /// Total API requests, by method/endpoint/status.
    pub static ref API_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("gonawin_api_requests_total", "Total API requests"),
        &["method", "endpoint", "status"],
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// API request duration in seconds, by endpoint.
    pub static ref API_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "gonawin_api_request_duration_seconds",
            "API request duration in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0]),
        &["endpoint"],
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(TASK_QUEUE_DEPTH.clone()),
        Box::new(PREDICTIONS_TOTAL.clone()),
        Box::new(MATCH_RESULTS_TOTAL.clone()),
        Box::new(PHASES_ADVANCED_TOTAL.clone()),
        Box::new(INVITES_SENT_TOTAL.clone()),
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(TASKS_PROCESSED_TOTAL.clone()),
        Box::new(API_REQUESTS_TOTAL.clone()),
        Box::new(API_REQUEST_DURATION_SECONDS.clone()),
    ];

    for c in collectors {
        if let Err(e) = REGISTRY.register(c) {
            tracing::warn!("Metric registration skipped: {e}");
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Metric encoding failed: {e}");
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Normalize a URL path for metric labels: replace numeric path segments with `:id`
/// to prevent cardinality explosion.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.parse::<i64>().is_ok() {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
