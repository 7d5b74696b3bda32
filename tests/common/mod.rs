//! Shared test utilities

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
};
use morse_tts::config::{Config, SynthesisConfig};
use morse_tts::ApiServerBuilder;
use tower::ServiceExt;

/// Build the full API router with the given limits
#[must_use]
pub fn build_test_router(max_input_chars: usize, rate_limit_rpm: Option<u32>) -> axum::Router {
    let config = Config {
        synthesis: SynthesisConfig {
            max_input_chars,
            ..SynthesisConfig::default()
        },
        ..Config::default()
    };
    ApiServerBuilder::new(&config)
        .rate_limit_rpm(rate_limit_rpm)
        .build()
        .router()
}

/// Send a request and collect status, content type, and body
pub async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, body.to_vec())
}

/// Build a JSON POST to the speech endpoint
#[must_use]
pub fn speech_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/audio/speech")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Attach the peer address a served connection would carry
#[must_use]
pub fn from_client(mut request: Request<Body>, addr: &str) -> Request<Body> {
    let addr: SocketAddr = addr.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}
