use axum::{Router, middleware, routing::get};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tube_auth_api::{config::ApiConfig, state::ApiState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    tube_auth_api::tracing::init_tracing(&config.env);

    // Not fatal: the provider rejects requests made without credentials
    for name in config.missing_credentials() {
        tracing::warn!("{name} is not set, provider requests will be rejected");
    }

    let metrics_handle = tube_auth_api::metrics::init_metrics()?;

    let state = ApiState::new(&config);

    let cors =
        tube_auth_api::middleware::cors::create_cors_layer(config.parsed_allowed_origins());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Merged before the relay fallback so /metrics is not relayed
    let metrics_app = Router::new()
        .route("/metrics", get(tube_auth_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = tube_auth_api::router::router()
        .with_state(state)
        .merge(metrics_app)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(tube_auth_api::metrics::track_metrics))
        .layer(middleware::from_fn(
            tube_auth_api::middleware::request_id::request_id_middleware,
        ));

    let app =
        tube_auth_api::middleware::security_headers::apply_security_headers(app, config.env.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    tracing::info!("Shutting down");
}
