//! The OAuth2 redirect relay.
//!
//! [`AuthRelay::handle_request`] classifies a request target and either
//! builds the provider authorization URL locally or forwards an
//! authorization code to the provider token endpoint. Unknown targets are
//! answered with a plain warning rather than an error.

pub mod client;
pub mod routes;

use serde_json::Value;
use tube_auth_core::{
    AuthUrl, AuthUrlRequest, Credentials, ProviderEndpoints, Route, TokenExchangeRequest, route,
};

pub use client::TokenClient;

use crate::{error::RelayError, metrics};

/// Result of a relay call
#[derive(Debug, Clone, PartialEq)]
pub enum RelayReply {
    /// `{"authUrl": ...}` for the authorization URL route
    AuthUrl(AuthUrl),
    /// Provider token document, untouched
    Tokens(Value),
    /// Warning for a target no route matched
    NotFound(String),
}

impl RelayReply {
    /// Body sent back to the caller
    ///
    /// Matched routes are JSON-stringified, the not-found warning is returned
    /// verbatim.
    pub fn into_body(self) -> Result<String, serde_json::Error> {
        match self {
            Self::AuthUrl(url) => serde_json::to_string(&url),
            Self::Tokens(tokens) => serde_json::to_string(&tokens),
            Self::NotFound(warning) => Ok(warning),
        }
    }

    pub fn is_json(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}

#[derive(Clone, Debug)]
pub struct AuthRelay {
    credentials: Credentials,
    endpoints: ProviderEndpoints,
    client: TokenClient,
}

impl AuthRelay {
    pub fn new(credentials: Credentials, endpoints: ProviderEndpoints, client: TokenClient) -> Self {
        Self {
            credentials,
            endpoints,
            client,
        }
    }

    /// Classify `target` (path plus optional query) and serve it
    pub async fn handle_request(&self, target: &str) -> Result<RelayReply, RelayError> {
        let route = match route::resolve(target) {
            Ok(Some(route)) => route,
            Ok(None) => {
                let warning = format!("api method not found for {target}");
                tracing::warn!("{warning}");
                metrics::record_relay_event("unknown", "not_found");
                return Ok(RelayReply::NotFound(warning));
            }
            Err(e) => {
                metrics::record_relay_event("unknown", "invalid");
                return Err(e.into());
            }
        };

        let name = route.name();
        tracing::debug!(route = name, "Matched relay route");

        let result = match route {
            Route::TokenRequestUrl(request) => Ok(RelayReply::AuthUrl(self.auth_url(&request))),
            Route::ExchangeTokens(request) => {
                self.exchange_tokens(&request).await.map(RelayReply::Tokens)
            }
        };

        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::record_relay_event(name, outcome);

        result
    }

    /// Authorization URL for the browser; the provider is not contacted
    pub fn auth_url(&self, request: &AuthUrlRequest) -> AuthUrl {
        request.authorization_url(&self.endpoints.auth_url, &self.credentials)
    }

    /// Trade an authorization code for the provider's token document
    pub async fn exchange_tokens(&self, request: &TokenExchangeRequest) -> Result<Value, RelayError> {
        let body = request.form_body(&self.credentials);

        match self.client.post_form(&self.endpoints.token_url, body).await {
            Ok(tokens) => {
                tracing::info!("Exchanged authorization code for tokens");
                Ok(tokens)
            }
            Err(e) => {
                tracing::error!(error = %e, "Token exchange failed");
                Err(e)
            }
        }
    }
}
