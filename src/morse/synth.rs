//! Morse waveform synthesis
//!
//! Text is first laid out as a sequence of [`Segment`]s (tones and gaps), then
//! each segment is rendered as a run of 16-bit samples. Gap lengths follow
//! PARIS timing: every sounded character already ends with one intra-symbol
//! gap, so character and word boundaries only add the remainder.

use std::f64::consts::PI;
use std::time::Duration;

use super::speed::Wpm;
use super::table::{self, CharacterCode, Symbol};

/// Output sample rate in Hz
pub const SAMPLE_RATE: u32 = 44_100;

/// Tone frequency in Hz
pub const TONE_HZ: f64 = 600.0;

/// Tone amplitude as a fraction of full scale
pub const AMPLITUDE: f64 = 0.5;

/// One element of the rendered timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Tone burst for a dot or dash
    Tone(Symbol),
    /// Silence between symbols, also emitted after every character
    IntraGap,
    /// Silence added before a character, on top of the trailing intra gap
    CharGap,
    /// Silence added for a word boundary, on top of the trailing intra gap
    WordGap,
}

/// Sample counts for each segment kind at a given speed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub dot: usize,
    pub dash: usize,
    pub intra_gap: usize,
    pub char_gap_extra: usize,
    pub word_gap_extra: usize,
}

impl Timing {
    /// Derive sample counts from a speed, truncating each duration
    #[must_use]
    pub fn from_wpm(wpm: Wpm) -> Self {
        let dot = wpm.dot_seconds();
        let dash = 3.0 * dot;
        let intra = dot;
        let char_gap = 3.0 * dot;
        let word_gap = 7.0 * dot;

        Self {
            dot: seconds_to_samples(dot),
            dash: seconds_to_samples(dash),
            intra_gap: seconds_to_samples(intra),
            char_gap_extra: seconds_to_samples(char_gap - intra),
            word_gap_extra: seconds_to_samples(word_gap - intra),
        }
    }

    /// Number of samples a segment renders to
    #[must_use]
    pub const fn samples(&self, segment: Segment) -> usize {
        match segment {
            Segment::Tone(Symbol::Dot) => self.dot,
            Segment::Tone(Symbol::Dash) => self.dash,
            Segment::IntraGap => self.intra_gap,
            Segment::CharGap => self.char_gap_extra,
            Segment::WordGap => self.word_gap_extra,
        }
    }

    /// Number of samples a whole layout renders to, saturating at `usize::MAX`
    #[must_use]
    pub fn total_samples(&self, layout: &[Segment]) -> usize {
        layout
            .iter()
            .fold(0usize, |total, &s| total.saturating_add(self.samples(s)))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn seconds_to_samples(seconds: f64) -> usize {
    (f64::from(SAMPLE_RATE) * seconds) as usize
}

/// Lay out text as tones and gaps
///
/// Unsupported characters are skipped without affecting gap placement, and
/// no gap precedes the first sounded character.
#[must_use]
pub fn segments(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut first = true;

    for c in text.to_uppercase().chars() {
        let Some(code) = table::lookup(c) else {
            tracing::warn!(character = ?c, "character not in morse table, skipping");
            continue;
        };

        let CharacterCode::Marks(_) = code else {
            if !first {
                out.push(Segment::WordGap);
            }
            continue;
        };

        if !first {
            out.push(Segment::CharGap);
        }
        first = false;

        for (i, symbol) in code.symbols().enumerate() {
            if i > 0 {
                out.push(Segment::IntraGap);
            }
            out.push(Segment::Tone(symbol));
        }
        out.push(Segment::IntraGap);
    }

    out
}

/// Rendered mono 16-bit audio at [`SAMPLE_RATE`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleBuffer(Vec<i16>);

impl SampleBuffer {
    /// Raw samples
    #[must_use]
    pub fn samples(&self) -> &[i16] {
        &self.0
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was rendered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Playback duration
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.0.len() as f64 / f64::from(SAMPLE_RATE))
    }
}

/// Renders text at a fixed speed
///
/// Tone bursts are computed once on construction and copied for each symbol.
#[derive(Debug)]
pub struct Synthesizer {
    timing: Timing,
    dot: Vec<i16>,
    dash: Vec<i16>,
}

impl Synthesizer {
    /// Create a synthesizer for the given speed
    #[must_use]
    pub fn new(wpm: Wpm) -> Self {
        let timing = Timing::from_wpm(wpm);
        let dot_seconds = wpm.dot_seconds();

        Self {
            dot: tone(timing.dot, dot_seconds),
            dash: tone(timing.dash, 3.0 * dot_seconds),
            timing,
        }
    }

    /// Sample counts used by this synthesizer
    #[must_use]
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Render text to samples
    ///
    /// Returns an empty buffer when nothing in `text` can be sounded.
    #[must_use]
    pub fn synthesize(&self, text: &str) -> SampleBuffer {
        let layout = segments(text);
        let mut samples = Vec::with_capacity(self.timing.total_samples(&layout));
        samples.extend(self.samples(&layout));
        SampleBuffer(samples)
    }

    /// Lazily render a layout, one sample at a time
    pub fn samples<'a>(&'a self, layout: &'a [Segment]) -> impl Iterator<Item = i16> + 'a {
        layout.iter().flat_map(move |&segment| {
            let (burst, silence): (&[i16], usize) = match segment {
                Segment::Tone(Symbol::Dot) => (self.dot.as_slice(), 0),
                Segment::Tone(Symbol::Dash) => (self.dash.as_slice(), 0),
                gap => (&[][..], self.timing.samples(gap)),
            };
            burst
                .iter()
                .copied()
                .chain(std::iter::repeat_n(0, silence))
        })
    }
}

/// Render text to samples at the given speed
#[must_use]
pub fn synthesize(text: &str, wpm: Wpm) -> SampleBuffer {
    Synthesizer::new(wpm).synthesize(text)
}

/// Sine burst of `count` samples spread evenly over `seconds`
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
fn tone(count: usize, seconds: f64) -> Vec<i16> {
    if count == 0 {
        return Vec::new();
    }
    let step = seconds / count as f64;
    let omega = 2.0 * PI * TONE_HZ;

    (0..count)
        .map(|i| {
            let t = i as f64 * step;
            let sample = (AMPLITUDE * (omega * t).sin()) as f32;
            (sample * 32767.0) as i16
        })
        .collect()
}
