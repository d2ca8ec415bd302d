//! Identity provider endpoints and client credentials.

use std::fmt;

/// Scope requested on every authorization URL.
pub const YOUTUBE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/youtube.readonly";

/// Google's OAuth2 authorization endpoint.
pub const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google's OAuth2 token endpoint.
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/token";

/// OAuth2 client identity registered with the provider.
///
/// Neither value is validated: an empty id or secret simply produces a
/// request the provider will reject.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth2 client identifier.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
}

impl Credentials {
    /// Create credentials from an id and secret.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Where the authorization and token endpoints live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    /// Endpoint the browser is sent to. Never fetched by the relay itself.
    pub auth_url: String,
    /// Endpoint the relay POSTs the authorization code to.
    pub token_url: String,
}

impl ProviderEndpoints {
    /// The Google OAuth2 endpoints.
    pub fn google() -> Self {
        Self {
            auth_url: GOOGLE_AUTH_ENDPOINT.to_string(),
            token_url: GOOGLE_TOKEN_ENDPOINT.to_string(),
        }
    }
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self::google()
    }
}

/// Join key/value pairs into `k=v&k=v`, percent-encoding every value.
///
/// Pair order is preserved. Only `A-Z a-z 0-9 - _ . ~` pass through
/// unescaped; `! * ' ( )` are escaped too.
pub(crate) fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
