use rubato::{FftFixedIn, Resampler};
use tracing::debug;

use crate::error::AnalysisError;

/// Sample rate every feature is computed at
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Input frames per resampler call
const CHUNK_FRAMES: usize = 1024;

/// Resample a complete mono signal to 16kHz.
///
/// Unlike a streaming resampler this compensates for the filter delay, so the
/// output is time-aligned with the input and exactly
/// `ceil(len * 16000 / source_rate)` samples long.
pub fn resample_to_target(samples: &[f32], source_rate: u32) -> Result<Vec<f32>, AnalysisError> {
    if source_rate == 0 {
        return Err(AnalysisError::DecodeError(
            "Sample rate must be non-zero".to_string(),
        ));
    }
    if source_rate == TARGET_SAMPLE_RATE || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let expected_len = target_length(samples.len(), source_rate);

    debug!(
        "Resampling {} samples: {} Hz -> {} Hz (ratio: {:.4})",
        samples.len(),
        source_rate,
        TARGET_SAMPLE_RATE,
        TARGET_SAMPLE_RATE as f64 / source_rate as f64
    );

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        TARGET_SAMPLE_RATE as usize,
        CHUNK_FRAMES,
        2, // sub_chunks for quality
        1, // mono
    )
    .map_err(|e| AnalysisError::DecodeError(format!("Failed to create resampler: {}", e)))?;

    let delay = resampler.output_delay();
    let mut input_buffer = vec![vec![0.0f32; CHUNK_FRAMES]; 1];
    let mut output_buffer = resampler.output_buffer_allocate(true);
    let mut output: Vec<f32> = Vec::with_capacity(expected_len + delay + CHUNK_FRAMES);

    let mut chunks = samples.chunks_exact(CHUNK_FRAMES);
    for chunk in &mut chunks {
        input_buffer[0].copy_from_slice(chunk);
        let (_, written) = resampler
            .process_into_buffer(&input_buffer, &mut output_buffer, None)
            .map_err(|e| AnalysisError::DecodeError(format!("Resampling failed: {}", e)))?;
        output.extend_from_slice(&output_buffer[0][..written]);
    }

    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let partial = [remainder];
        let (_, written) = resampler
            .process_partial_into_buffer(Some(&partial[..]), &mut output_buffer, None)
            .map_err(|e| AnalysisError::DecodeError(format!("Resampling failed: {}", e)))?;
        output.extend_from_slice(&output_buffer[0][..written]);
    }

    // Drain the filter delay line with silence
    while output.len() < expected_len + delay {
        let (_, written) = resampler
            .process_partial_into_buffer(None::<&[Vec<f32>]>, &mut output_buffer, None)
            .map_err(|e| AnalysisError::DecodeError(format!("Resampling failed: {}", e)))?;
        if written == 0 {
            break;
        }
        output.extend_from_slice(&output_buffer[0][..written]);
    }

    let mut resampled: Vec<f32> = output.into_iter().skip(delay).take(expected_len).collect();
    resampled.resize(expected_len, 0.0);
    Ok(resampled)
}

/// Number of 16kHz samples covering `len` samples at `source_rate`
fn target_length(len: usize, source_rate: u32) -> usize {
    let numerator = len as u64 * TARGET_SAMPLE_RATE as u64;
    numerator.div_ceil(source_rate as u64) as usize
}
