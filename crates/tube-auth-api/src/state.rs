use std::sync::Arc;

use crate::{
    ApiConfig,
    config::Environment,
    relay::{AuthRelay, TokenClient},
};

#[derive(Clone, Debug)]
pub struct ApiState {
    pub relay: Arc<AuthRelay>,
    pub environment: Environment,
}

impl ApiState {
    pub fn new(config: &ApiConfig) -> Self {
        let relay = AuthRelay::new(config.credentials(), config.endpoints(), TokenClient::new());

        tracing::debug!(
            auth_endpoint = %config.auth_endpoint,
            token_endpoint = %config.token_endpoint,
            "Relay configured"
        );

        Self {
            relay: Arc::new(relay),
            environment: config.env.clone(),
        }
    }
}
