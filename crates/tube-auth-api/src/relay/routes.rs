use axum::{
    extract::State,
    http::{Uri, header},
    response::{IntoResponse, Response},
};

use crate::{ApiState, error::ApiError};

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Catch-all handler feeding every request target to the relay
///
/// Routing happens inside the relay because its patterns match anywhere in
/// the target, not on whole paths.
pub async fn relay_request(
    State(state): State<ApiState>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let target = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());

    let reply = state.relay.handle_request(target).await?;

    let content_type = if reply.is_json() {
        JSON_CONTENT_TYPE
    } else {
        TEXT_CONTENT_TYPE
    };
    let body = reply.into_body()?;

    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}
