use access_core::Permissions;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub access_decisions_total: IntCounterVec,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

pub fn metrics() -> &'static Metrics {
    METRICS.get_or_init(|| {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let access_decisions_total = IntCounterVec::new(
            Opts::new(
                "access_decisions_total",
                "Access decisions made for dashboard components",
            ),
            &["component", "decision"],
        )
        .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(access_decisions_total.clone()))
            .expect("collector can be registered");

        Metrics {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            access_decisions_total,
        }
    })
}

/// Count an access decision for a component slug.
pub fn record_decision(component: &str, permissions: &Permissions) {
    let decision = if permissions.can_access {
        "granted"
    } else {
        "denied"
    };
    metrics()
        .access_decisions_total
        .with_label_values(&[component, decision])
        .inc();
}

pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = metrics().registry.gather();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
