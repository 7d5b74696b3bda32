//! Voice selector to transmission speed mapping

use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// Speed used when no preset matches and the multiplier is 1.0
pub const BASE_WPM: f64 = 20.0;

/// Slowest speed rendered; slower requests are raised to this
pub const MIN_WPM: f64 = 1.0;

/// Accepted range for a request's speed multiplier
pub const SPEED_RANGE: std::ops::RangeInclusive<f64> = 0.25..=4.0;

/// Named presets, matched case-insensitively against the request's `voice`
const PRESETS: &[(&str, f64)] = &[
    ("alloy", 15.0),
    ("echo", 20.0),
    ("fable", 25.0),
    ("onyx", 30.0),
    ("nova", 12.0),
    ("shimmer", 18.0),
    ("slowpoke", 8.0),
    ("speedy", 35.0),
];

/// Transmission speed in words per minute
///
/// Always finite and at least [`MIN_WPM`].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Wpm(f64);

impl Wpm {
    /// Create a speed
    ///
    /// Non-positive or non-finite values fall back to [`BASE_WPM`], positive
    /// values below [`MIN_WPM`] are raised to it.
    #[must_use]
    pub fn new(wpm: f64) -> Self {
        if !(wpm.is_finite() && wpm > 0.0) {
            tracing::warn!(wpm, fallback = BASE_WPM, "invalid speed, using base speed");
            Self(BASE_WPM)
        } else if wpm < MIN_WPM {
            tracing::warn!(wpm, min = MIN_WPM, "speed too slow, using minimum speed");
            Self(MIN_WPM)
        } else {
            Self(wpm)
        }
    }

    /// Words per minute
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Duration of one dot in seconds (PARIS timing)
    #[must_use]
    pub fn dot_seconds(self) -> f64 {
        1.2 / self.0
    }
}

impl Default for Wpm {
    fn default() -> Self {
        Self(BASE_WPM)
    }
}

impl fmt::Display for Wpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} WPM", self.0)
    }
}

/// A named speed preset
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Preset {
    pub voice: &'static str,
    pub wpm: Wpm,
}

/// All presets in declaration order
pub fn presets() -> impl Iterator<Item = Preset> {
    PRESETS.iter().map(|&(voice, wpm)| Preset { voice, wpm: Wpm(wpm) })
}

/// Look up a preset by voice name (case-insensitive, exact match)
#[must_use]
pub fn preset(voice: &str) -> Option<Wpm> {
    let voice = voice.to_lowercase();
    PRESETS
        .iter()
        .find(|(name, _)| *name == voice)
        .map(|&(_, wpm)| Wpm(wpm))
}

/// Check a speed multiplier against [`SPEED_RANGE`]
///
/// # Errors
///
/// Returns `Error::InvalidSpeed` if `speed` is outside the range
pub fn check_speed(speed: f64) -> Result<()> {
    if SPEED_RANGE.contains(&speed) {
        Ok(())
    } else {
        Err(Error::InvalidSpeed(speed))
    }
}

/// Resolve the effective speed for a request
///
/// A matching preset wins outright and `speed` is ignored. Otherwise the
/// result is [`BASE_WPM`] scaled by `speed`.
#[must_use]
pub fn resolve(voice: &str, speed: f64) -> Wpm {
    if let Some(wpm) = preset(voice) {
        tracing::debug!(voice, %wpm, "using mapped voice, ignoring speed");
        return wpm;
    }

    let wpm = Wpm::new(BASE_WPM * speed);
    tracing::debug!(voice, speed, %wpm, "voice not mapped, scaling base speed");
    wpm
}
