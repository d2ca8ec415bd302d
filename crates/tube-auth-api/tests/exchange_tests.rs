use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{Value, json};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};
use tube_auth_core::Credentials;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string, header, method, path},
};

use crate::common::{TEST_CLIENT_ID, TEST_CLIENT_SECRET, TestClient, TestStateBuilder};

const EXCHANGE_PATH: &str = "/api/exchangeTokens/code/abc/redirect/http%3A%2F%2Flocalhost%2Fcb";

fn client_for(provider: &MockServer) -> TestClient {
    TestStateBuilder::new()
        .token_endpoint(format!("{}/o/oauth2/token", provider.uri()))
        .client()
}

fn expected_form_body() -> String {
    format!(
        "code=abc&redirect_uri=http%3A%2F%2Flocalhost%2Fcb&client_id={}&client_secret={}&grant_type=authorization_code",
        TEST_CLIENT_ID, TEST_CLIENT_SECRET
    )
}

#[tokio::test]
async fn test_exchange_posts_form_and_passes_tokens_through() {
    let provider = MockServer::start().await;
    let tokens = json!({
        "access_token": "ya29.access",
        "refresh_token": "1//refresh",
        "expires_in": 3600,
        "token_type": "Bearer"
    });

    Mock::given(method("POST"))
        .and(path("/o/oauth2/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(expected_form_body()))
        .respond_with(ResponseTemplate::new(200).set_body_json(&tokens))
        .expect(1)
        .mount(&provider)
        .await;

    let client = client_for(&provider);
    let response = client.get(EXCHANGE_PATH).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.content_type(), "application/json");
    assert_eq!(response.json::<Value>(), tokens);
    provider.verify().await;
}

#[tokio::test]
async fn test_exchange_minimal_token_document() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"access_token":"x","expires_in":3600}"#, "application/json"),
        )
        .mount(&provider)
        .await;

    let client = client_for(&provider);
    let response = client.get(EXCHANGE_PATH).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({"access_token": "x", "expires_in": 3600})
    );
}

#[tokio::test]
async fn test_exchange_decodes_code_segment() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string(format!(
            "code=4%2F0AbCd&redirect_uri=https%3A%2F%2Fapp.test%2Fcb&client_id={}&client_secret={}&grant_type=authorization_code",
            TEST_CLIENT_ID, TEST_CLIENT_SECRET
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "y"})))
        .expect(1)
        .mount(&provider)
        .await;

    let client = client_for(&provider);
    let response = client
        .get("/api/exchangeTokens/code/4%2F0AbCd/redirect/https%3A%2F%2Fapp.test%2Fcb")
        .await;

    response.assert_status(StatusCode::OK);
    provider.verify().await;
}

#[tokio::test]
async fn test_exchange_with_missing_credentials_still_posts() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string(
            "code=abc&redirect_uri=http%3A%2F%2Flocalhost%2Fcb&client_id=&client_secret=&grant_type=authorization_code",
        ))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_client"})),
        )
        .expect(1)
        .mount(&provider)
        .await;

    let client = TestStateBuilder::new()
        .credentials(Credentials::default())
        .token_endpoint(format!("{}/o/oauth2/token", provider.uri()))
        .client();

    let response = client.get(EXCHANGE_PATH).await;

    // Provider error documents are relayed like any other JSON body
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({"error": "invalid_client"}));
    provider.verify().await;
}

#[tokio::test]
async fn test_exchange_empty_body_is_bad_gateway() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&provider)
        .await;

    let client = client_for(&provider);
    let response = client.get(EXCHANGE_PATH).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["error"].is_string(), "Should have error message");
}

#[tokio::test]
async fn test_exchange_non_json_error_page_is_bad_gateway() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503).set_body_string("<html>Service Unavailable</html>"),
        )
        .mount(&provider)
        .await;

    let client = client_for(&provider);
    let response = client.get(EXCHANGE_PATH).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(
        body["error"].as_str().unwrap().contains("status 503"),
        "error should mention provider status: {body}"
    );
}

#[tokio::test]
async fn test_exchange_connection_failure_is_bad_gateway() {
    // Reserve a port, then free it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let token_url = format!("http://127.0.0.1:{port}/o/oauth2/token");

    let client = TestStateBuilder::new().token_endpoint(token_url).client();
    let response = client.get(EXCHANGE_PATH).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}

/// Serve a single request, answering with `chunks` as a chunked JSON body
///
/// Returns the token endpoint URL and a handle resolving to the raw request.
async fn spawn_chunked_provider(chunks: Vec<&'static str>) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/o/oauth2/token", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !String::from_utf8_lossy(&request).ends_with("grant_type=authorization_code") {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before the form body arrived");
            request.extend_from_slice(&buf[..n]);
        }

        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\n\
                  Content-Type: application/json\r\n\
                  Transfer-Encoding: chunked\r\n\
                  Connection: close\r\n\r\n",
            )
            .await
            .unwrap();

        for chunk in chunks {
            let frame = format!("{:x}\r\n{}\r\n", chunk.len(), chunk);
            socket.write_all(frame.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
            // Give the client a chance to read each chunk separately
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        socket.write_all(b"0\r\n\r\n").await.unwrap();
        socket.flush().await.unwrap();

        String::from_utf8_lossy(&request).into_owned()
    });

    (url, handle)
}

#[tokio::test]
async fn test_exchange_joins_chunked_body_in_order() {
    let (token_url, provider) = spawn_chunked_provider(vec![
        r#"{"access_token":"ya29."#,
        r#"abc","refresh_token":"1//"#,
        r#"xyz","expires_in":36"#,
        r#"00,"token_type":"Bearer"}"#,
    ])
    .await;

    let client = TestStateBuilder::new().token_endpoint(token_url).client();
    let response = client.get(EXCHANGE_PATH).await;

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "access_token": "ya29.abc",
            "refresh_token": "1//xyz",
            "expires_in": 3600,
            "token_type": "Bearer"
        })
    );

    let request = provider.await.unwrap();
    assert!(request.starts_with("POST /o/oauth2/token HTTP/1.1"));
    assert!(request.ends_with(&expected_form_body()));
}
