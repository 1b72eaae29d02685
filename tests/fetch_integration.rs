//! Integration tests for envelope classification and session reuse.
//!
//! These tests run the fetcher against mock HTTP servers.

use std::sync::Arc;

use aladhan_client::{ClientConfig, ClientError, ContentFetcher, SessionManager};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_json(server: &MockServer, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

fn fetcher_for(server: &MockServer) -> ContentFetcher {
    ContentFetcher::new(ClientConfig::with_base_url(server.uri()))
}

#[tokio::test]
async fn test_fetch_ok_envelope_returns_payload() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/methods",
        200,
        json!({"code": 200, "status": "OK", "data": {"MWL": {"id": 3}}}),
    )
    .await;

    let fetcher = fetcher_for(&server);
    let payload = fetcher
        .fetch(&format!("{}/methods", server.uri()))
        .await
        .expect("fetch should succeed");
    assert_eq!(payload, Some(json!({"MWL": {"id": 3}})));
}

#[tokio::test]
async fn test_fetch_error_envelope_with_4xx_status_line() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/calendar",
        400,
        json!({"code": 400, "status": "Bad Request", "data": "Please specify a latitude"}),
    )
    .await;

    let err = fetcher_for(&server)
        .fetch(&format!("{}/calendar", server.uri()))
        .await
        .unwrap_err();
    match err {
        ClientError::Remote { code, status } => {
            assert_eq!(code, Some(400));
            assert_eq!(status, "Bad Request");
        }
        other => panic!("expected Remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_empty_body_is_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let payload = fetcher_for(&server)
        .fetch(&format!("{}/empty", server.uri()))
        .await
        .expect("empty body is not an error");
    assert!(payload.is_none());
}

#[tokio::test]
async fn test_fetch_html_error_page_is_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gateway"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let payload = fetcher_for(&server)
        .fetch(&format!("{}/gateway", server.uri()))
        .await
        .unwrap();
    assert!(payload.is_none());
}

#[tokio::test]
async fn test_fetch_unreachable_host_is_no_content() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let payload = ContentFetcher::new(ClientConfig::with_base_url(uri.clone()))
        .fetch(&format!("{uri}/methods"))
        .await
        .expect("transport failure maps to no content");
    assert!(payload.is_none());
}

#[tokio::test]
async fn test_fetch_session_failure_is_no_content() {
    let config = ClientConfig {
        user_agent: "broken\r\nagent".to_string(),
        ..ClientConfig::default()
    };
    let payload = ContentFetcher::new(config)
        .fetch("http://127.0.0.1:9/methods")
        .await
        .unwrap();
    assert!(payload.is_none());
}

#[tokio::test]
async fn test_consecutive_fetches_share_one_session() {
    let server = MockServer::start().await;
    mount_json(&server, "/methods", 200, json!({"code": 200, "status": "OK", "data": [1]})).await;

    let fetcher = fetcher_for(&server);
    let url = format!("{}/methods", server.uri());

    fetcher.fetch(&url).await.unwrap();
    let first = fetcher.sessions().acquire().unwrap().id();
    fetcher.fetch(&url).await.unwrap();
    let second = fetcher.sessions().acquire().unwrap().id();
    assert_eq!(first, second, "session must be reused between fetches");

    fetcher.sessions().close();
    fetcher.fetch(&url).await.unwrap();
    let third = fetcher.sessions().acquire().unwrap().id();
    assert_ne!(second, third, "closed session must be replaced");
}

#[tokio::test]
async fn test_fetchers_can_share_a_session_manager() {
    let server = MockServer::start().await;
    mount_json(&server, "/methods", 200, json!({"code": 200, "status": "OK", "data": [1]})).await;

    let sessions = Arc::new(SessionManager::new(ClientConfig::with_base_url(server.uri())));
    let a = ContentFetcher::with_sessions(Arc::clone(&sessions));
    let b = ContentFetcher::with_sessions(Arc::clone(&sessions));
    let url = format!("{}/methods", server.uri());

    let (left, right) = tokio::join!(a.fetch(&url), b.fetch(&url));
    assert_eq!(left.unwrap(), right.unwrap());
    assert_eq!(
        a.sessions().acquire().unwrap().id(),
        b.sessions().acquire().unwrap().id()
    );
}
