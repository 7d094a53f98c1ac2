//! Centered short-time analysis shared by every frame-based feature.
//!
//! The signal is zero-padded by `n_fft / 2` on both sides so that frame `t`
//! is centered on sample `t * hop_length`, giving `1 + len / hop_length`
//! frames for any non-empty signal.

use realfft::{RealFftPlanner, RealToComplex};
use std::f32::consts::PI;
use std::sync::Arc;

use super::config::FeatureConfig;
use crate::error::AnalysisError;

/// Per-frame results of one pass over the signal
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    /// Magnitude spectrum per frame, `n_fft/2 + 1` bins each
    pub magnitudes: Vec<Vec<f32>>,
    /// Root-mean-square amplitude per (unwindowed) frame
    pub frame_rms: Vec<f32>,
}

impl FrameAnalysis {
    pub fn n_frames(&self) -> usize {
        self.frame_rms.len()
    }
}

/// Frame analyzer with pre-computed window and FFT plan
pub struct FrameAnalyzer {
    n_fft: usize,
    hop_length: usize,
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
}

impl FrameAnalyzer {
    pub fn new(config: &FeatureConfig) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(config.n_fft);

        Self {
            n_fft: config.n_fft,
            hop_length: config.hop_length,
            fft,
            window: periodic_hann(config.n_fft),
        }
    }

    /// Compute magnitude spectra and frame RMS for a non-empty signal
    pub fn analyze(&self, samples: &[f32]) -> Result<FrameAnalysis, AnalysisError> {
        let padded = pad_center(samples, self.n_fft);
        let n_frames = frame_count(samples.len(), self.hop_length);

        let mut fft_input = self.fft.make_input_vec();
        let mut fft_output = self.fft.make_output_vec();
        let mut magnitudes = Vec::with_capacity(n_frames);
        let mut frame_rms = Vec::with_capacity(n_frames);

        for frame_idx in 0..n_frames {
            let start = frame_idx * self.hop_length;
            let frame = &padded[start..start + self.n_fft];

            let power = frame.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>()
                / self.n_fft as f64;
            frame_rms.push(power.sqrt() as f32);

            for ((dst, &sample), &w) in fft_input.iter_mut().zip(frame).zip(&self.window) {
                *dst = sample * w;
            }

            self.fft
                .process(&mut fft_input, &mut fft_output)
                .map_err(|e| AnalysisError::DecodeError(format!("FFT failed: {}", e)))?;

            magnitudes.push(fft_output.iter().map(|c| c.norm()).collect());
        }

        Ok(FrameAnalysis {
            magnitudes,
            frame_rms,
        })
    }
}

/// Number of centered frames for a signal of `len` samples
pub fn frame_count(len: usize, hop_length: usize) -> usize {
    1 + len / hop_length
}

/// Zero-pad `n_fft / 2` samples on both sides
fn pad_center(samples: &[f32], n_fft: usize) -> Vec<f32> {
    let pad = n_fft / 2;
    let mut padded = vec![0.0f32; samples.len() + 2 * pad];
    padded[pad..pad + samples.len()].copy_from_slice(samples);
    padded
}

/// Hann window for spectral analysis (periodic, not symmetric)
fn periodic_hann(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f32 / n as f32).cos())
        .collect()
}
