//! WAV container encoding

use std::io::Cursor;

use super::synth::{SAMPLE_RATE, SampleBuffer};
use crate::Result;

/// Media type of every encoded asset
pub const WAV_MEDIA_TYPE: &str = "audio/wav";

/// Encoded audio ready to be sent to a client
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioAsset {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
}

/// Container parameters, fixed for every asset
#[must_use]
pub const fn wav_spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Wrap samples in a mono 16-bit PCM WAV container
///
/// # Errors
///
/// Returns error if the container cannot be written
pub fn encode(buffer: &SampleBuffer) -> Result<AudioAsset> {
    encode_samples(buffer.len(), buffer.samples().iter().copied())
}

/// Write samples straight into a WAV container without buffering them first
///
/// `len_hint` sizes the output allocation and should be the sample count.
///
/// # Errors
///
/// Returns error if the container cannot be written
pub fn encode_samples(
    len_hint: usize,
    samples: impl IntoIterator<Item = i16>,
) -> Result<AudioAsset> {
    let capacity = len_hint.saturating_mul(2).saturating_add(44);
    let mut cursor = Cursor::new(Vec::with_capacity(capacity));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, wav_spec())?;
        for sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(AudioAsset {
        bytes: cursor.into_inner(),
        media_type: WAV_MEDIA_TYPE,
    })
}
