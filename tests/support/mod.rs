//! Shared fixtures for HTTP-level tests.

#![allow(dead_code)]

use mockito::Matcher;
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;
use tripmate::GatewayConfig;

pub const API_KEY: &str = "test-key";
pub const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";

/// Matches the generateContent path with or without a query string attached.
pub fn path_matcher() -> Matcher {
    Matcher::Regex(format!("^{}", regex_escape(MODEL_PATH)))
}

pub fn key_matcher() -> Matcher {
    Matcher::UrlEncoded("key".into(), API_KEY.into())
}

pub fn gateway_config(base_url: &str) -> GatewayConfig {
    GatewayConfig::new(&format!("{}{}", base_url, MODEL_PATH), API_KEY)
        .expect("valid test endpoint")
        .with_connect_timeout(Duration::from_secs(2))
        .with_request_timeout(Duration::from_secs(5))
}

/// A nominal generateContent response carrying `text`.
pub fn gemini_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 2, "totalTokenCount": 12 }
    })
    .to_string()
}

/// Accepts connections and never answers. Returns the base URL.
pub async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on.
pub async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

fn regex_escape(s: &str) -> String {
    regex::escape(s)
}
