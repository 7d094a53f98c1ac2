//! Loudness features: mean RMS energy and non-silent segment rate.

/// Amplitude floor used when converting frame RMS to dB
const AMPLITUDE_FLOOR: f32 = 1e-5;

/// Mean of the per-frame RMS values (0.0 when there are no frames)
pub fn mean_rms(frame_rms: &[f32]) -> f32 {
    if frame_rms.is_empty() {
        return 0.0;
    }
    let sum: f64 = frame_rms.iter().map(|&r| r as f64).sum();
    (sum / frame_rms.len() as f64) as f32
}

/// Mark frames louder than `top_db` below the loudest frame.
///
/// Levels are `20·log10(max(rms, 1e-5))` relative to the same transform of
/// the loudest frame, so an all-zero signal is uniformly "loud" (0 dB).
pub fn non_silent_frames(frame_rms: &[f32], top_db: f32) -> Vec<bool> {
    let peak = frame_rms.iter().copied().fold(0.0f32, f32::max);
    let reference_db = amplitude_to_db(peak);
    frame_rms
        .iter()
        .map(|&rms| amplitude_to_db(rms) - reference_db > -top_db)
        .collect()
}

/// Number of contiguous runs of non-silent frames
pub fn count_segments(non_silent: &[bool]) -> usize {
    let mut count = 0;
    let mut in_segment = false;
    for &loud in non_silent {
        if loud && !in_segment {
            count += 1;
        }
        in_segment = loud;
    }
    count
}

/// Non-silent segments per second of audio.
///
/// `duration_secs` must be positive; the extractor rejects empty signals
/// before calling this.
pub fn speaking_rate(frame_rms: &[f32], top_db: f32, duration_secs: f64) -> f32 {
    debug_assert!(duration_secs > 0.0);
    let segments = count_segments(&non_silent_frames(frame_rms, top_db));
    (segments as f64 / duration_secs) as f32
}

fn amplitude_to_db(amplitude: f32) -> f32 {
    20.0 * amplitude.max(AMPLITUDE_FLOOR).log10()
}
