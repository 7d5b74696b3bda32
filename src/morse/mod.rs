//! Morse code rendering
//!
//! Text goes through the symbol table, is laid out with PARIS timing at the
//! resolved speed, sampled as a 600 Hz tone, and wrapped in a WAV container.

mod speed;
mod synth;
pub mod table;
mod wav;

pub use speed::{
    BASE_WPM, MIN_WPM, Preset, SPEED_RANGE, Wpm, check_speed, preset, presets, resolve,
};
pub use synth::{
    AMPLITUDE, SAMPLE_RATE, SampleBuffer, Segment, Synthesizer, TONE_HZ, Timing, segments,
    synthesize,
};
pub use table::{CharacterCode, Symbol};
pub use wav::{AudioAsset, WAV_MEDIA_TYPE, encode, encode_samples, wav_spec};

use crate::{Error, Result};

/// Render text to a WAV asset at the given speed
///
/// The layout is sized before any audio is generated, and samples are
/// streamed into the container, so memory stays near `2 * max_samples` bytes.
///
/// # Errors
///
/// Returns `Error::EmptyOutput` if nothing in `text` can be sounded,
/// `Error::OutputTooLong` if the audio would exceed `max_samples`, or an
/// audio error if encoding fails
pub fn render(text: &str, wpm: Wpm, max_samples: usize) -> Result<AudioAsset> {
    let layout = segments(text);
    let total = Timing::from_wpm(wpm).total_samples(&layout);
    if total == 0 {
        return Err(Error::EmptyOutput);
    }
    if total > max_samples {
        return Err(Error::OutputTooLong {
            samples: total,
            max: max_samples,
        });
    }

    let synth = Synthesizer::new(wpm);
    let asset = encode_samples(total, synth.samples(&layout))?;

    tracing::debug!(
        samples = total,
        bytes = asset.bytes.len(),
        %wpm,
        "synthesized morse audio"
    );

    Ok(asset)
}
