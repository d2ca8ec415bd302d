//! Prometheus metrics for the relay.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static PARAM_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(code|redirect)/[^/]+").expect("param segment regex is valid"));

/// Install the Prometheus recorder
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    // Token exchanges dominate latency, so the buckets stretch to 10s
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Middleware recording request counts and latency per normalized path
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Collapse authorization codes and redirect URIs so paths stay low-cardinality
fn normalize_path(path: &str) -> String {
    PARAM_SEGMENT.replace_all(path, "/${1}/:${1}").into_owned()
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Count a relay call by route and outcome
pub fn record_relay_event(route: &'static str, outcome: &'static str) {
    counter!("relay_requests_total", "route" => route, "outcome" => outcome).increment(1);
}
