//! Error types for the Morse speech server

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering or serving Morse audio
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio container error
    #[error("audio error: {0}")]
    Audio(String),

    /// Input produced no audible output
    #[error("could not generate audio: input is empty or contains only unsupported characters")]
    EmptyOutput,

    /// Input exceeds the configured character cap
    #[error("input is {len} characters, maximum is {max}")]
    InputTooLong { len: usize, max: usize },

    /// Rendered audio would exceed the configured sample cap
    #[error("audio would be {samples} samples, maximum is {max}")]
    OutputTooLong { samples: usize, max: usize },

    /// Speed multiplier outside the accepted range
    #[error("speed must be between 0.25 and 4.0, got {0}")]
    InvalidSpeed(f64),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<hound::Error> for Error {
    fn from(e: hound::Error) -> Self {
        Self::Audio(e.to_string())
    }
}
