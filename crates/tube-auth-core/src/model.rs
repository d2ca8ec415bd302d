//! Per-request values exchanged with the identity provider.

use serde::Serialize;

use crate::provider::{Credentials, YOUTUBE_READONLY_SCOPE, encode_pairs};

/// A request for the provider authorization URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUrlRequest {
    /// Decoded callback address the provider redirects back to.
    pub redirect_uri: String,
}

impl AuthUrlRequest {
    /// Build the URL the browser should visit to grant consent.
    ///
    /// Query parameters are emitted as `client_id`, `redirect_uri`, `scope`,
    /// `response_type`, each value percent-encoded.
    pub fn authorization_url(&self, auth_endpoint: &str, credentials: &Credentials) -> AuthUrl {
        let query = encode_pairs(&[
            ("client_id", credentials.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", YOUTUBE_READONLY_SCOPE),
            ("response_type", "code"),
        ]);

        AuthUrl {
            auth_url: format!("{auth_endpoint}?{query}"),
        }
    }
}

/// The authorization URL returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrl {
    /// Fully formed provider authorization URL.
    pub auth_url: String,
}

/// A request to trade an authorization code for tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenExchangeRequest {
    /// Decoded authorization code.
    pub code: String,
    /// Decoded redirect URI; must match the one used for the authorization URL.
    pub redirect_uri: String,
}

impl TokenExchangeRequest {
    /// Form-encoded body for the token endpoint POST.
    pub fn form_body(&self, credentials: &Credentials) -> String {
        encode_pairs(&[
            ("code", self.code.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("grant_type", "authorization_code"),
        ])
    }
}
