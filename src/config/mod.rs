//! Configuration management for the Morse speech server
//!
//! Values resolve in order env > toml > default. CLI flags are applied on top
//! by the binary.

pub mod file;

use std::path::Path;

use self::file::ConfigFile;
use crate::{Error, Result};

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default API server port
pub const DEFAULT_PORT: u16 = 8081;

/// Default cap on request `input` length, in characters
pub const DEFAULT_MAX_INPUT_CHARS: usize = 4096;

/// Default cap on rendered audio, in samples (30 minutes at 44.1 kHz)
pub const DEFAULT_MAX_SAMPLES: usize = 44_100 * 60 * 30;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP API server configuration
    pub server: ServerConfig,

    /// Synthesis limits
    pub synthesis: SynthesisConfig,
}

/// HTTP API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (from `MORSE_TTS_HOST`)
    pub host: String,

    /// Port to listen on (from `MORSE_TTS_PORT` or `PORT`)
    pub port: u16,

    /// Speech requests per minute per client address, unlimited when `None`
    /// (from `MORSE_TTS_RATE_LIMIT_RPM`)
    pub rate_limit_rpm: Option<u32>,
}

/// Synthesis limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// Longest accepted `input`, in characters (from `MORSE_TTS_MAX_INPUT_CHARS`)
    pub max_input_chars: usize,

    /// Longest rendered audio, in samples (from `MORSE_TTS_MAX_SAMPLES`)
    pub max_samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                rate_limit_rpm: None,
            },
            synthesis: SynthesisConfig::default(),
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

impl Config {
    /// Load configuration from the standard config file and the environment
    ///
    /// # Errors
    ///
    /// Returns error if an environment variable holds an invalid value
    pub fn load() -> Result<Self> {
        Self::resolve(file::load_config_file(), |key| std::env::var(key).ok())
    }

    /// Load configuration from an explicit config file and the environment
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or an environment
    /// variable holds an invalid value
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::resolve(file::read_config_file(path)?, |key| std::env::var(key).ok())
    }

    /// Merge file values with variables from `env`
    ///
    /// # Errors
    ///
    /// Returns error if a variable holds an invalid value
    pub fn resolve(fc: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port_var = ["MORSE_TTS_PORT", "PORT"]
            .into_iter()
            .find_map(|key| env(key).map(|v| (key, v)));
        let port: Option<u16> = match port_var {
            Some((key, v)) => Some(parse_var(key, &v)?),
            None => fc.server.port,
        };

        let rate_limit_rpm: Option<u32> = match env("MORSE_TTS_RATE_LIMIT_RPM") {
            Some(v) => Some(parse_var("MORSE_TTS_RATE_LIMIT_RPM", &v)?),
            None => fc.server.rate_limit_rpm,
        }
        .filter(|&rpm| rpm > 0);

        let max_input_chars: Option<usize> = match env("MORSE_TTS_MAX_INPUT_CHARS") {
            Some(v) => Some(parse_var("MORSE_TTS_MAX_INPUT_CHARS", &v)?),
            None => fc.synthesis.max_input_chars,
        };

        let max_samples: Option<usize> = match env("MORSE_TTS_MAX_SAMPLES") {
            Some(v) => Some(parse_var("MORSE_TTS_MAX_SAMPLES", &v)?),
            None => fc.synthesis.max_samples,
        };

        Ok(Self {
            server: ServerConfig {
                host: env("MORSE_TTS_HOST")
                    .or(fc.server.host)
                    .unwrap_or(defaults.server.host),
                port: port.unwrap_or(defaults.server.port),
                rate_limit_rpm,
            },
            synthesis: SynthesisConfig {
                max_input_chars: max_input_chars.unwrap_or(defaults.synthesis.max_input_chars),
                max_samples: max_samples.unwrap_or(defaults.synthesis.max_samples),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid value for {key}: {value:?}")))
}
