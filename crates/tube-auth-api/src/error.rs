use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tube_auth_core::RouteError;

/// Failures of a single relay call
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid request path: {0}")]
    Route(#[from] RouteError),
    #[error("Token endpoint request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Token endpoint returned non-JSON body (status {status}): {source}")]
    InvalidJson {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Relay(RelayError::Route(_)) => StatusCode::BAD_REQUEST,
            Self::Relay(RelayError::Transport(_) | RelayError::InvalidJson { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Relay request failed");
        } else {
            tracing::warn!(error = %self, "Rejected relay request");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
