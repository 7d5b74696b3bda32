//! Liveness endpoints

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// Root info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub message: &'static str,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Server info - points clients at the speech endpoint
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        message: "Morse Code TTS Server is running. POST to /v1/audio/speech",
    })
}

/// Liveness probe - is the service running?
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build liveness router (no state required)
pub fn router() -> Router {
    Router::new()
        .route("/", get(info))
        .route("/health", get(health))
}
