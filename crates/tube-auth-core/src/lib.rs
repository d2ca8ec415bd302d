//! Core building blocks for the tube-auth OAuth2 relay
//!
//! This crate is free of I/O. It classifies inbound request targets into
//! relay routes and builds the two provider-facing artifacts: the
//! authorization URL handed to the browser and the form body posted to the
//! token endpoint.

pub mod error;
pub mod model;
pub mod provider;
pub mod route;

pub use error::RouteError;
pub use model::{AuthUrl, AuthUrlRequest, TokenExchangeRequest};
pub use provider::{Credentials, ProviderEndpoints, YOUTUBE_READONLY_SCOPE};
pub use route::{Route, RouteTable};
