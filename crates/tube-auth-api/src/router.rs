use axum::{Router, http::StatusCode, routing::any};

use crate::{relay, state::ApiState};

/// Application routes
///
/// `/health` is the only path answered outside the relay, for any method;
/// everything else reaches the relay through the fallback.
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", any(health))
        .fallback(relay::routes::relay_request)
}

async fn health() -> StatusCode {
    StatusCode::OK
}
