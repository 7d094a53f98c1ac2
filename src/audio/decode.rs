//! WAV decoding into a mono [`AudioSignal`].

use hound::{SampleFormat, WavReader, WavSpec};
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;

use super::AudioSignal;
use crate::error::AnalysisError;

/// Decode an in-memory WAV file (as received from an upload)
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<AudioSignal, AnalysisError> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    decode(reader)
}

/// Decode a WAV file from disk
pub fn load_wav(path: &Path) -> Result<AudioSignal, AnalysisError> {
    let reader = WavReader::open(path)
        .map_err(|e| AnalysisError::DecodeError(format!("{}: {}", path.display(), e)))?;
    decode(reader)
}

fn decode<R: Read>(mut reader: WavReader<R>) -> Result<AudioSignal, AnalysisError> {
    let spec = reader.spec();
    validate_spec(&spec)?;

    debug!(
        "Decoding WAV: {} Hz, {} channels, {} bits {:?}",
        spec.sample_rate, spec.channels, spec.bits_per_sample, spec.sample_format
    );

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            // Full-scale integer maps to [-1.0, 1.0)
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let samples = downmix(&interleaved, spec.channels as usize);
    Ok(AudioSignal::new(samples, spec.sample_rate))
}

fn validate_spec(spec: &WavSpec) -> Result<(), AnalysisError> {
    if spec.sample_rate == 0 {
        return Err(AnalysisError::DecodeError(
            "WAV header declares a zero sample rate".to_string(),
        ));
    }
    if spec.channels == 0 {
        return Err(AnalysisError::DecodeError(
            "WAV header declares zero channels".to_string(),
        ));
    }
    match spec.sample_format {
        SampleFormat::Int if (1..=32).contains(&spec.bits_per_sample) => Ok(()),
        SampleFormat::Float if spec.bits_per_sample == 32 => Ok(()),
        format => Err(AnalysisError::DecodeError(format!(
            "Unsupported sample format: {} bits {:?}",
            spec.bits_per_sample, format
        ))),
    }
}

/// Average interleaved channels into one
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
