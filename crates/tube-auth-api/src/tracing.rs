//! Tracing and logging setup.
//!
//! Development gets pretty, human-readable output at DEBUG with source
//! locations. Production gets flattened JSON at INFO for log aggregation.
//! `RUST_LOG` overrides the default filter in both modes, for example
//! `RUST_LOG=debug,reqwest=trace`.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

const DEVELOPMENT_FILTER: &str = "debug,tower_http=debug,hyper_util=info,reqwest=info";
const PRODUCTION_FILTER: &str = "info,tower_http=info,hyper_util=warn,reqwest=warn";

/// Install the global subscriber for `env`
///
/// Must be called once, before the first log line.
pub fn init_tracing(env: &Environment) {
    let default_filter = if env.is_development() {
        DEVELOPMENT_FILTER
    } else {
        PRODUCTION_FILTER
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = if env.is_development() {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .flatten_event(true)
            .with_target(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .init();

    tracing::info!(environment = ?env, "Tracing initialized");
}
