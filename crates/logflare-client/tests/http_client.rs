//! HttpClient against a mock Logflare server.

use logflare_client::{ClientConfig, HttpClient, LogflareApi, TransportError};
use logflare_model::ResourceKind;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = ClientConfig::new(server.uri(), Some("test-token".to_string())).unwrap();
    HttpClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_create_posts_body_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sources"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({"name": "my-cool-source"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42,
            "name": "my-cool-source",
            "token": "tok-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .create(ResourceKind::Source, &json!({"name": "my-cool-source"}))
        .await
        .unwrap();

    assert_eq!(response.status, 201);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["token"], "tok-1");
}

#[tokio::test]
async fn test_show_update_delete_address_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/endpoints/ep-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "e"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/endpoints/ep-1"))
        .and(body_json(json!({"name": "e", "query": "select 1"})))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/endpoints/ep-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let shown = client.show(ResourceKind::Endpoint, "ep-1").await.unwrap();
    assert_eq!(shown.status, 200);

    let updated = client
        .update(
            ResourceKind::Endpoint,
            "ep-1",
            &json!({"name": "e", "query": "select 1"}),
        )
        .await
        .unwrap();
    assert_eq!(updated.status, 204);
    assert!(!updated.has_body());

    let deleted = client.delete(ResourceKind::Endpoint, "ep-1").await.unwrap();
    assert_eq!(deleted.status, 204);
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sources/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .show(ResourceKind::Source, "missing")
        .await
        .unwrap();
    assert_eq!(response.status, 404);
    assert_eq!(response.body, "not found");
}

#[tokio::test]
async fn test_query_route() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/endpoints/query/errors-by-hour"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"result": [{"count": 1}]})),
        )
        .mount(&server)
        .await;

    let response = client_for(&server).query("errors-by-hour").await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_timeout_is_a_transport_error_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sources/secret-token-123"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), Some("test-token".to_string()))
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let client = HttpClient::new(&config).unwrap();

    let err = client
        .show(ResourceKind::Source, "secret-token-123")
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Request(_)));
    assert!(!format!("{err} {err:?}").contains("secret-token-123"));
}
