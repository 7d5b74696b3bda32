//! Morse TTS - speech-API compatible server that renders text as Morse code
//!
//! Requests carry the familiar `input`/`voice`/`speed` fields. The `voice`
//! picks a transmission speed in words per minute and the response is a mono
//! 16-bit WAV of a 600 Hz tone keyed with PARIS timing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    HTTP API                          │
//! │   POST /v1/audio/speech  │  GET /v1/audio/voices    │
//! └────────────────────┬────────────────────────────────┘
//!                      │  (text, voice, speed)
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Morse renderer                      │
//! │   Speed resolver │ Symbol table │ Synth │ WAV       │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod morse;

pub use api::{ApiServer, ApiServerBuilder};
pub use config::Config;
pub use error::{Error, Result};
pub use morse::{AudioAsset, SampleBuffer, Wpm, render, resolve, synthesize};
