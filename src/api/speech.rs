//! Speech-API compatible endpoints
//!
//! `voice` selects a transmission speed instead of a timbre. Only WAV is
//! produced, whatever `response_format` asks for.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{rate_limit, ApiState};
use crate::morse::{self, Preset, BASE_WPM};
use crate::Error;

/// Build speech router
///
/// Only `/speech` is rate limited.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/speech", post(create_speech))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_by_client,
        ))
        .route("/voices", get(voices))
        .with_state(state)
}

/// Speech request, shaped like a speech-synthesis API request
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    /// Ignored, output is always Morse
    #[serde(default = "default_model")]
    pub model: String,
    pub input: String,
    /// Speed preset name, case-insensitive
    #[serde(default = "default_voice")]
    pub voice: String,
    /// Ignored, output is always WAV
    #[serde(default = "default_response_format")]
    pub response_format: String,
    /// Multiplier on the base speed, used only when `voice` is not a preset
    #[serde(default = "default_speed")]
    pub speed: f64,
}

fn default_model() -> String {
    "morse-code".to_string()
}

fn default_voice() -> String {
    "echo".to_string()
}

fn default_response_format() -> String {
    "wav".to_string()
}

const fn default_speed() -> f64 {
    1.0
}

/// Render the request's input as Morse audio
///
/// Returns audio in WAV format
async fn create_speech(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<Response, SpeechError> {
    let Json(request) = payload?;

    let input_chars = request.input.chars().count();
    tracing::info!(
        model = %request.model,
        voice = %request.voice,
        speed = request.speed,
        input_chars,
        "received speech request"
    );

    morse::check_speed(request.speed)?;

    let max = state.synthesis.max_input_chars;
    if input_chars > max {
        return Err(SpeechError::InputTooLong {
            len: input_chars,
            max,
        });
    }

    if !request.response_format.eq_ignore_ascii_case("wav") {
        tracing::debug!(
            response_format = %request.response_format,
            "unsupported response format requested, returning wav"
        );
    }

    let wpm = morse::resolve(&request.voice, request.speed);

    let started = Instant::now();
    let input = request.input;
    let max_samples = state.synthesis.max_samples;
    let asset = tokio::task::spawn_blocking(move || morse::render(&input, wpm, max_samples))
        .await
        .map_err(|e| SpeechError::Internal(e.to_string()))??;

    tracing::info!(
        bytes = asset.bytes.len(),
        %wpm,
        elapsed_ms = started.elapsed().as_millis(),
        "generated morse audio"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, asset.media_type)],
        asset.bytes,
    )
        .into_response())
}

/// Preset listing response
#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    /// Speed used for unmapped voices at `speed` 1.0
    pub base_wpm: f64,
    pub voices: Vec<Preset>,
}

/// List the named speed presets
async fn voices() -> Json<VoicesResponse> {
    Json(VoicesResponse {
        base_wpm: BASE_WPM,
        voices: morse::presets().collect(),
    })
}

/// Speech API errors
#[derive(Debug)]
pub enum SpeechError {
    /// Body could not be read as a speech request
    InvalidBody(JsonRejection),
    InvalidSpeed(f64),
    InputTooLong { len: usize, max: usize },
    /// Rendered audio would be longer than the configured cap
    OutputTooLong { samples: usize, max: usize },
    /// Nothing in the input could be sounded
    EmptyOutput,
    Internal(String),
}

impl From<JsonRejection> for SpeechError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}

impl From<Error> for SpeechError {
    fn from(e: Error) -> Self {
        match e {
            Error::EmptyOutput => Self::EmptyOutput,
            Error::InvalidSpeed(speed) => Self::InvalidSpeed(speed),
            Error::InputTooLong { len, max } => Self::InputTooLong { len, max },
            Error::OutputTooLong { samples, max } => Self::OutputTooLong { samples, max },
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Status for an unreadable body
///
/// Malformed JSON is reported as 422 like a schema mismatch, so 400 only ever
/// means the input had nothing to sound.
fn rejection_status(rejection: &JsonRejection) -> StatusCode {
    match rejection {
        JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        other => other.status(),
    }
}

impl IntoResponse for SpeechError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            detail: String,
        }

        let (status, detail) = match self {
            Self::InvalidBody(rejection) => (rejection_status(&rejection), rejection.body_text()),
            Self::InvalidSpeed(speed) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Error::InvalidSpeed(speed).to_string(),
            ),
            Self::InputTooLong { len, max } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Error::InputTooLong { len, max }.to_string(),
            ),
            Self::OutputTooLong { samples, max } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Error::OutputTooLong { samples, max }.to_string(),
            ),
            Self::EmptyOutput => (
                StatusCode::BAD_REQUEST,
                "Could not generate audio. Input might be empty or contain only unsupported characters."
                    .to_string(),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "error generating morse audio");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Internal server error: {msg}"),
                )
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: SpeechRequest = serde_json::from_str(r#"{"input": "sos"}"#).unwrap();
        assert_eq!(request.model, "morse-code");
        assert_eq!(request.voice, "echo");
        assert_eq!(request.response_format, "wav");
        assert!((request.speed - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_input_is_required() {
        assert!(serde_json::from_str::<SpeechRequest>(r#"{"voice": "onyx"}"#).is_err());
    }

    #[test]
    fn test_error_statuses() {
        let cases = [
            (SpeechError::InvalidSpeed(9.0), StatusCode::UNPROCESSABLE_ENTITY),
            (
                SpeechError::InputTooLong { len: 10, max: 5 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                SpeechError::OutputTooLong { samples: 10, max: 5 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (SpeechError::EmptyOutput, StatusCode::BAD_REQUEST),
            (
                SpeechError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_library_errors_map_to_speech_errors() {
        assert!(matches!(
            SpeechError::from(Error::OutputTooLong { samples: 9, max: 1 }),
            SpeechError::OutputTooLong { samples: 9, max: 1 }
        ));
        assert!(matches!(
            SpeechError::from(Error::EmptyOutput),
            SpeechError::EmptyOutput
        ));
        assert!(matches!(
            SpeechError::from(Error::Audio("bad".to_string())),
            SpeechError::Internal(_)
        ));
    }
}
