//! API endpoint integration tests

use std::io::Cursor;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use morse_tts::morse::{self, Timing, Wpm};
use serde_json::json;

mod common;
use common::{build_test_router, from_client, send, speech_request};

fn wav_samples(bytes: Vec<u8>) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
    (reader.spec(), samples)
}

#[tokio::test]
async fn test_root_endpoint() {
    let app = build_test_router(4096, None);
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["message"].as_str().unwrap().contains("/v1/audio/speech"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_test_router(4096, None);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_voices_endpoint() {
    let app = build_test_router(4096, None);
    let request = Request::builder()
        .uri("/v1/audio/voices")
        .body(Body::empty())
        .unwrap();

    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["base_wpm"], 20.0);
    let voices = json["voices"].as_array().unwrap();
    assert_eq!(voices.len(), 8);
    assert!(voices.contains(&json!({"voice": "onyx", "wpm": 30.0})));
}

#[tokio::test]
async fn test_speech_returns_wav() {
    let app = build_test_router(4096, None);
    let request = speech_request(&json!({
        "model": "tts-1",
        "input": "SOS",
        "voice": "echo"
    }));

    let (status, content_type, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("audio/wav"));

    let (spec, samples) = wav_samples(body);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44_100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(samples, morse::synthesize("SOS", Wpm::new(20.0)).samples());
}

#[tokio::test]
async fn test_speech_voice_overrides_speed() {
    let app = build_test_router(4096, None);
    let request = speech_request(&json!({"input": "E", "voice": "ONYX", "speed": 2.0}));

    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let timing = Timing::from_wpm(Wpm::new(30.0));
    let (_, samples) = wav_samples(body);
    assert_eq!(samples.len(), timing.dot + timing.intra_gap);
}

#[tokio::test]
async fn test_speech_unmapped_voice_uses_speed() {
    let app = build_test_router(4096, None);
    let request = speech_request(&json!({"input": "E", "voice": "nobody", "speed": 2.0}));

    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let timing = Timing::from_wpm(Wpm::new(40.0));
    let (_, samples) = wav_samples(body);
    assert_eq!(samples.len(), timing.dot + timing.intra_gap);
}

#[tokio::test]
async fn test_speech_ignores_response_format() {
    let app = build_test_router(4096, None);
    let request = speech_request(&json!({"input": "hi", "response_format": "mp3"}));

    let (status, content_type, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("audio/wav"));
    assert_eq!(&body[0..4], b"RIFF");
}

#[tokio::test]
async fn test_speech_empty_input_is_bad_request() {
    for input in ["", "   ", "~~~", "#%^"] {
        let app = build_test_router(4096, None);
        let (status, content_type, body) = send(app, speech_request(&json!({"input": input}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "input {input:?}");
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["detail"].as_str().unwrap().contains("Could not generate audio"));
    }
}

#[tokio::test]
async fn test_speech_input_too_long() {
    let app = build_test_router(5, None);
    let (status, _, body) = send(app, speech_request(&json!({"input": "CQ CQ DE"}))).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["detail"], "input is 8 characters, maximum is 5");
}

#[tokio::test]
async fn test_speech_input_at_limit() {
    let app = build_test_router(5, None);
    let (status, _, _) = send(app, speech_request(&json!({"input": "CQ CQ"}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_speech_speed_out_of_range() {
    for speed in [0.1, 4.5, -1.0] {
        let app = build_test_router(4096, None);
        let request = speech_request(&json!({"input": "E", "voice": "nobody", "speed": speed}));

        let (status, _, body) = send(app, request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "speed {speed}");
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["detail"].as_str().unwrap().starts_with("speed must be between"));
    }
}

#[tokio::test]
async fn test_speech_missing_input() {
    let app = build_test_router(4096, None);
    let (status, _, body) = send(app, speech_request(&json!({"voice": "echo"}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["detail"].as_str().unwrap().contains("input"));
}

#[tokio::test]
async fn test_speech_malformed_json() {
    let app = build_test_router(4096, None);
    let request = Request::builder()
        .method("POST")
        .uri("/v1/audio/speech")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"input\": "))
        .unwrap();

    // 400 is reserved for input with nothing to sound
    let (status, content_type, body) = send(app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_speech_slow_long_input_exceeds_sample_cap() {
    let app = build_test_router(4096, None);
    let request = speech_request(&json!({
        "input": "0".repeat(4096),
        "voice": "nobody",
        "speed": 0.25
    }));

    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("audio would be"), "{detail}");
    assert!(detail.ends_with("maximum is 79380000"), "{detail}");
}

#[tokio::test]
async fn test_rate_limit_is_per_client() {
    let app = build_test_router(4096, Some(1));
    let speech = |addr| from_client(speech_request(&json!({"input": "E"})), addr);

    let (status, _, _) = send(app.clone(), speech("192.0.2.1:5000")).await;
    assert_eq!(status, StatusCode::OK);

    // Same address on a new connection shares the budget
    let (status, _, body) = send(app.clone(), speech("192.0.2.1:5001")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body.is_empty());

    let (status, _, _) = send(app, speech("192.0.2.2:5000")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_covers_only_speech() {
    const CLIENT: &str = "192.0.2.1:5000";
    let app = build_test_router(4096, Some(1));
    let get = |uri| {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        from_client(request, CLIENT)
    };

    let request = from_client(speech_request(&json!({"input": "E"})), CLIENT);
    let (status, _, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);

    for uri in ["/", "/health", "/v1/audio/voices", "/health"] {
        let (status, _, _) = send(app.clone(), get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
}
