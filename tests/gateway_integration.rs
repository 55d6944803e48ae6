//! Integration tests for the HTTP gateway.
//!
//! These tests verify status classification and decoding against mock
//! HTTP servers.

use cbql_gateway::gateway::{
    Credential, DEFAULT_RETRY_AFTER_SECS, GatewayError, HttpGateway, RemoteGateway, RemoteRequest,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credential() -> Credential {
    Credential::new("Bearer integration-token")
}

fn gateway_for(mock_server: &MockServer) -> HttpGateway {
    HttpGateway::new(&mock_server.uri()).expect("mock server uri should be a valid base url")
}

#[tokio::test]
async fn test_gateway_429_with_retry_after_seconds() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway
        .call(&credential(), RemoteRequest::get("v3/projects"))
        .await;

    match result {
        Err(GatewayError::RateLimited { retry_after_secs }) => assert_eq!(retry_after_secs, 12),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_gateway_429_without_retry_after_defaults_to_30() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/items/query"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway
        .call(
            &credential(),
            RemoteRequest::post("v3/items/query").json(json!({"page": 1})),
        )
        .await;

    let error = result.expect_err("429 should be an error");
    assert_eq!(error.retry_after_secs(), Some(DEFAULT_RETRY_AFTER_SECS));
}

#[tokio::test]
async fn test_gateway_429_large_retry_after_is_not_capped() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "86400"))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let error = gateway
        .call(&credential(), RemoteRequest::get("v3/projects"))
        .await
        .expect_err("429 should be an error");

    assert_eq!(error.retry_after_secs(), Some(86_400));
}

#[tokio::test]
async fn test_gateway_error_status_carries_body_text() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/items/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Item not found"))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway
        .call(&credential(), RemoteRequest::get("v3/items/404"))
        .await;

    match result {
        Err(GatewayError::Remote { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "Item not found");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn test_gateway_server_error_is_not_rate_limited() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("Retry-After", "5")
                .set_body_string("maintenance"),
        )
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let error = gateway
        .call(&credential(), RemoteRequest::get("v3/projects"))
        .await
        .expect_err("503 should be an error");

    assert!(matches!(error, GatewayError::Remote { status: 503, .. }));
    assert_eq!(error.retry_after_secs(), None);
}

#[tokio::test]
async fn test_gateway_invalid_json_is_decode_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway
        .call(&credential(), RemoteRequest::get("v3/projects"))
        .await;

    assert!(
        matches!(result, Err(GatewayError::Decode { .. })),
        "non-JSON 2xx body should be a decode error: {result:?}"
    );
}

#[tokio::test]
async fn test_gateway_multipart_body_for_comments() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/items/7/comments"))
        .and(header("Authorization", "Bearer integration-token"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("Ship it"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway
        .call(
            &credential(),
            RemoteRequest::post("v3/items/7/comments")
                .multipart(vec![("comment".to_string(), "Ship it".to_string())]),
        )
        .await
        .expect("multipart request should succeed");

    assert_eq!(result, json!({"id": 3}));
}

#[tokio::test]
async fn test_gateway_base_path_is_preserved() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cb/api/v3/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = HttpGateway::new(&format!("{}/cb/api", mock_server.uri()))
        .expect("base url with path should be valid");
    let result = gateway
        .call(&credential(), RemoteRequest::get("/v3/projects"))
        .await
        .expect("request should succeed");

    assert_eq!(result, json!([]));
}

#[tokio::test]
async fn test_gateway_connection_refused_is_network_error() {
    // Port 9 (discard) is not listening in test environments
    let gateway = HttpGateway::with_timeouts("http://127.0.0.1:9", 2, 2)
        .expect("loopback base url should be valid");
    let result = gateway
        .call(&credential(), RemoteRequest::get("v3/projects"))
        .await;

    assert!(
        matches!(
            result,
            Err(GatewayError::Network { .. } | GatewayError::Timeout { .. })
        ),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn test_gateway_sends_user_agent_header() {
    let mock_server = MockServer::start().await;
    let expected = format!("cbql-gateway/{}", env!("CARGO_PKG_VERSION"));
    Mock::given(method("GET"))
        .and(path("/v3/projects"))
        .and(header("user-agent", expected.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway
        .call(&credential(), RemoteRequest::get("v3/projects"))
        .await;

    assert!(result.is_ok(), "User-Agent should match: {result:?}");
}
