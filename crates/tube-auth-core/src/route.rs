//! Ordered route table mapping request targets to relay operations.
//!
//! Patterns are matched against any substring of the target, so extra
//! prefix or suffix segments do not prevent a match. Entries are tried in
//! order and the first match wins: the authorization URL route is checked
//! before the token exchange route.

use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

use crate::{
    error::RouteError,
    model::{AuthUrlRequest, TokenExchangeRequest},
};

/// A classified relay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/api/tokenRequestUrl/redirect/<redirectUri>`
    TokenRequestUrl(AuthUrlRequest),
    /// `/api/exchangeTokens/code/<code>/redirect/<redirectUri>`
    ExchangeTokens(TokenExchangeRequest),
}

impl Route {
    /// Stable name used in logs and metric labels.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TokenRequestUrl(_) => "token_request_url",
            Self::ExchangeTokens(_) => "exchange_tokens",
        }
    }
}

type RouteBuilder = fn(&Captures<'_>) -> Result<Route, RouteError>;

struct RouteEntry {
    pattern: Regex,
    build: RouteBuilder,
}

/// First-match table of `(pattern, builder)` entries.
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.pattern.as_str()))
            .finish()
    }
}

impl RouteTable {
    /// The relay's two routes, in precedence order.
    pub fn new() -> Self {
        Self {
            entries: vec![
                RouteEntry {
                    pattern: Regex::new(r"/api/tokenRequestUrl/redirect/([^/?&]+)")
                        .expect("token request pattern is valid"),
                    build: build_token_request_url,
                },
                RouteEntry {
                    pattern: Regex::new(r"/api/exchangeTokens/code/([^/]+)/redirect/([^/?&]+)")
                        .expect("token exchange pattern is valid"),
                    build: build_exchange_tokens,
                },
            ],
        }
    }

    /// Classify a request target (path plus optional query).
    ///
    /// Returns `Ok(None)` when no entry matches.
    pub fn resolve(&self, target: &str) -> Result<Option<Route>, RouteError> {
        for entry in &self.entries {
            if let Some(captures) = entry.pattern.captures(target) {
                return (entry.build)(&captures).map(Some);
            }
        }

        Ok(None)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

static ROUTES: LazyLock<RouteTable> = LazyLock::new(RouteTable::new);

/// Classify a request target against the shared route table.
pub fn resolve(target: &str) -> Result<Option<Route>, RouteError> {
    ROUTES.resolve(target)
}

fn build_token_request_url(captures: &Captures<'_>) -> Result<Route, RouteError> {
    Ok(Route::TokenRequestUrl(AuthUrlRequest {
        redirect_uri: decode_segment(&captures[1])?,
    }))
}

fn build_exchange_tokens(captures: &Captures<'_>) -> Result<Route, RouteError> {
    Ok(Route::ExchangeTokens(TokenExchangeRequest {
        code: decode_segment(&captures[1])?,
        redirect_uri: decode_segment(&captures[2])?,
    }))
}

/// Percent-decode a captured path segment.
///
/// `+` is kept literally; only `%XX` escapes are decoded. A `%` not followed
/// by two hex digits is rejected.
fn decode_segment(segment: &str) -> Result<String, RouteError> {
    if !has_well_formed_escapes(segment) {
        return Err(RouteError::MalformedEscape {
            segment: segment.to_string(),
        });
    }

    urlencoding::decode(segment)
        .map(Cow::into_owned)
        .map_err(|source| RouteError::Decode {
            segment: segment.to_string(),
            source,
        })
}

fn has_well_formed_escapes(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }

    true
}
