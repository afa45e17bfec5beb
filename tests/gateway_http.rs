//! HTTP-level tests for the Gemini gateway: status mapping, the request contract,
//! spawned and blocking calls, timeouts and transport failures.

mod support;

use futures::FutureExt;
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use support::{closed_port, gateway_config, gemini_body, key_matcher, path_matcher, silent_server, API_KEY};
use tripmate::{ApiError, BlockingGateway, HttpGateway, Prompt, RequestEnvelope, ResponseExtractor};

fn envelope(text: &str) -> RequestEnvelope {
    RequestEnvelope::build(&Prompt::generation(text))
}

#[tokio::test]
async fn test_success_returns_raw_body() {
    let mut server = mockito::Server::new_async().await;
    let body = gemini_body("Paris is lovely");
    let mock = server
        .mock("POST", path_matcher())
        .match_query(key_matcher())
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.clone())
        .expect(1)
        .create_async()
        .await;

    let gateway = HttpGateway::new(&gateway_config(&server.url())).unwrap();
    let raw = gateway.call(&envelope("Is Paris nice in May?")).await.unwrap();

    assert_eq!(raw, body);
    assert_eq!(ResponseExtractor::extract(&raw).as_deref(), Some("Paris is lovely"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_request_body_is_single_part_envelope() {
    let mut server = mockito::Server::new_async().await;
    let query = r#"He said "go" \ then left"#;
    let expected_text = Prompt::generation(query).as_str().to_string();
    let mock = server
        .mock("POST", path_matcher())
        .match_query(key_matcher())
        .match_body(Matcher::Json(json!({
            "contents": [{ "parts": [{ "text": expected_text }] }]
        })))
        .with_status(200)
        .with_body(gemini_body("ok"))
        .expect(1)
        .create_async()
        .await;

    let gateway = HttpGateway::new(&gateway_config(&server.url())).unwrap();
    gateway.call(&envelope(query)).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_statuses_map_to_api_errors() {
    let cases = [
        (400u16, ApiError::BadRequest),
        (401, ApiError::Auth { status: 401 }),
        (403, ApiError::Auth { status: 403 }),
        (429, ApiError::QuotaExceeded),
        (500, ApiError::Server { status: 500 }),
        (503, ApiError::Server { status: 503 }),
        (404, ApiError::Status { status: 404 }),
    ];

    for (status, expected) in cases {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", path_matcher())
            .with_status(usize::from(status))
            .with_body(r#"{"error":{"message":"nope"}}"#)
            .expect(1)
            .create_async()
            .await;

        let gateway = HttpGateway::new(&gateway_config(&server.url())).unwrap();
        let err = gateway.call(&envelope("Where next?")).await.unwrap_err();
        assert_eq!(err, expected, "status {}", status);
        assert_eq!(err.status(), Some(status));
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_redirect_is_an_error_and_not_followed() {
    let mut server = mockito::Server::new_async().await;
    let redirect = server
        .mock("POST", path_matcher())
        .match_query(key_matcher())
        .with_status(302)
        .with_header("location", "/elsewhere")
        .expect(1)
        .create_async()
        .await;
    let elsewhere = server
        .mock("GET", "/elsewhere")
        .with_status(200)
        .with_body(gemini_body("Redirected answer"))
        .expect(0)
        .create_async()
        .await;

    let gateway = HttpGateway::new(&gateway_config(&server.url())).unwrap();
    let err = gateway.call(&envelope("Where to?")).await.unwrap_err();

    assert_eq!(err, ApiError::Status { status: 302 });
    redirect.assert_async().await;
    elsewhere.assert_async().await;
}

#[tokio::test]
async fn test_quota_exceeded_is_retryable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", path_matcher())
        .with_status(429)
        .create_async()
        .await;

    let gateway = HttpGateway::new(&gateway_config(&server.url())).unwrap();
    let err = gateway.call(&envelope("Flights to Lima?")).await.unwrap_err();
    assert_eq!(err, ApiError::QuotaExceeded);
    assert!(err.retryable());
}

#[tokio::test]
async fn test_timeout_against_silent_server() {
    let base = silent_server().await;
    let config = gateway_config(&base).with_request_timeout(Duration::from_millis(300));
    let gateway = HttpGateway::new(&config).unwrap();

    let start = Instant::now();
    let err = gateway.call(&envelope("Anyone there?")).await.unwrap_err();

    assert_eq!(err, ApiError::Timeout { timeout_ms: 300 });
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let base = closed_port().await;
    let gateway = HttpGateway::new(&gateway_config(&base)).unwrap();

    match gateway.call(&envelope("Hello?")).await {
        Err(ApiError::Transport(message)) => {
            assert!(!message.contains(API_KEY), "credential leaked: {}", message);
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_spawned_call_resolves_and_chains() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", path_matcher())
        .match_query(key_matcher())
        .with_status(200)
        .with_body(gemini_body("Try Kyoto in spring"))
        .expect(2)
        .create_async()
        .await;

    let gateway = Arc::new(HttpGateway::new(&gateway_config(&server.url())).unwrap());

    let first = gateway.spawn_call(envelope("Japan in April?"));
    let raw = first.await.unwrap();
    assert!(raw.contains("Try Kyoto in spring"));

    let answer = gateway
        .spawn_call(envelope("Japan in April?"))
        .map(|result| result.map(|body| ResponseExtractor::extract(&body)))
        .await
        .unwrap();
    assert_eq!(answer.as_deref(), Some("Try Kyoto in spring"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_aborted_call_resolves_to_transport_error() {
    let base = silent_server().await;
    let gateway = Arc::new(HttpGateway::new(&gateway_config(&base)).unwrap());

    let pending = gateway.spawn_call(envelope("Never mind"));
    pending.abort();
    let err = pending.await.unwrap_err();
    assert_eq!(err, ApiError::Transport("call aborted".to_string()));
}

#[test]
fn test_blocking_gateway_matches_async_path() {
    let mut server = mockito::Server::new();
    let ok = server
        .mock("POST", path_matcher())
        .match_query(key_matcher())
        .match_body(Matcher::Regex("Visit Rome".into()))
        .with_status(200)
        .with_body(gemini_body("Visit Rome."))
        .expect(1)
        .create();
    let denied = server
        .mock("POST", path_matcher())
        .match_body(Matcher::Regex("Forbidden city".into()))
        .with_status(403)
        .expect(1)
        .create();

    let gateway = BlockingGateway::new(&gateway_config(&server.url())).unwrap();

    let raw = gateway.call(&envelope("Visit Rome")).unwrap();
    assert_eq!(ResponseExtractor::extract(&raw).as_deref(), Some("Visit Rome."));

    let err = gateway.call(&envelope("Forbidden city")).unwrap_err();
    assert_eq!(err, ApiError::Auth { status: 403 });

    ok.assert();
    denied.assert();
}
