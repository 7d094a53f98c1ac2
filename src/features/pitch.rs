//! Spectral peak pitch tracking.
//!
//! ## Algorithm
//! For every frame of the magnitude spectrogram:
//! 1. Threshold each bin against `pitch_threshold` × the frame's peak magnitude
//! 2. Keep bins that are local maxima along frequency within [fmin, fmax)
//! 3. Refine each kept bin by parabolic interpolation over its neighbours
//!
//! Every kept (frame, bin) pair is one pitch estimate. The feature is the mean
//! of all strictly positive estimates, or exactly 0.0 when there are none.

use super::config::FeatureConfig;

/// Pitch tracker over a magnitude spectrogram
pub struct PitchTracker {
    sample_rate: f32,
    n_fft: usize,
    fmin: f32,
    fmax: f32,
    threshold: f32,
}

impl PitchTracker {
    pub fn new(config: &FeatureConfig) -> Self {
        Self {
            sample_rate: config.sample_rate as f32,
            n_fft: config.n_fft,
            fmin: config.pitch_fmin.max(0.0),
            fmax: config.pitch_fmax.min(config.sample_rate as f32 / 2.0),
            threshold: config.pitch_threshold,
        }
    }

    /// All pitch estimates (Hz) of one magnitude frame
    pub fn frame_pitches(&self, magnitudes: &[f32]) -> Vec<f32> {
        let n_bins = magnitudes.len();
        if n_bins < 3 {
            return Vec::new();
        }

        let peak = magnitudes.iter().copied().fold(0.0f32, f32::max);
        let reference = self.threshold * peak;
        let gated = |i: usize| {
            if magnitudes[i] > reference {
                magnitudes[i]
            } else {
                0.0
            }
        };

        let bin_hz = self.sample_rate / self.n_fft as f32;
        let mut pitches = Vec::new();

        for bin in 0..n_bins {
            let freq = bin as f32 * bin_hz;
            if freq < self.fmin || freq >= self.fmax {
                continue;
            }

            // Local maximum of the gated spectrum; edges compare against themselves
            let current = gated(bin);
            let prev = if bin == 0 { current } else { gated(bin - 1) };
            let next = if bin + 1 == n_bins { current } else { gated(bin + 1) };
            if !(current > prev && current >= next) {
                continue;
            }

            let shift = parabolic_shift(magnitudes, bin);
            pitches.push((bin as f32 + shift) * bin_hz);
        }

        pitches
    }

    /// Mean of the strictly positive estimates across all frames
    pub fn mean_pitch(&self, magnitudes: &[Vec<f32>]) -> f32 {
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for frame in magnitudes {
            for pitch in self.frame_pitches(frame) {
                if pitch > 0.0 {
                    sum += pitch as f64;
                    count += 1;
                }
            }
        }

        if count == 0 {
            return 0.0;
        }
        (sum / count as f64) as f32
    }
}

/// Vertex offset of the parabola through bins `i-1`, `i`, `i+1`.
///
/// Zero at the spectrum edges and wherever the fit is degenerate.
fn parabolic_shift(spectrum: &[f32], i: usize) -> f32 {
    if i == 0 || i + 1 >= spectrum.len() {
        return 0.0;
    }
    let a = spectrum[i + 1] + spectrum[i - 1] - 2.0 * spectrum[i];
    let b = (spectrum[i + 1] - spectrum[i - 1]) / 2.0;
    if b.abs() >= a.abs() {
        return 0.0;
    }
    -b / a
}
