use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use tower::ServiceExt;
use tube_auth_api::{AuthRelay, TokenClient, config::Environment, router, state::ApiState};
use tube_auth_core::{Credentials, ProviderEndpoints};

pub const TEST_CLIENT_ID: &str = "test-client-id.apps.googleusercontent.com";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";

/// Test state builder pointing the relay at an arbitrary token endpoint
pub struct TestStateBuilder {
    credentials: Credentials,
    endpoints: ProviderEndpoints,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            credentials: Credentials::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET),
            endpoints: ProviderEndpoints::google(),
        }
    }

    pub fn token_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoints.token_url = url.into();
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn build(self) -> ApiState {
        let relay = AuthRelay::new(self.credentials, self.endpoints, TokenClient::new());

        ApiState {
            relay: Arc::new(relay),
            environment: Environment::Development,
        }
    }

    /// Build the state and wrap the application router around it
    pub fn client(self) -> TestClient {
        TestClient::new(router::router().with_state(self.build()))
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with no body
    pub async fn post(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Unexpected status, body: {}",
            self.text()
        );
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Response body is not valid JSON")
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}
