//! Frame analysis parameters.

use crate::audio::TARGET_SAMPLE_RATE;

/// Parameters for feature extraction.
///
/// The defaults are the values the classifier was trained against; changing
/// them produces vectors the model has never seen.
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// Analysis sample rate (Hz)
    pub sample_rate: u32,

    /// FFT size and frame length (in samples)
    pub n_fft: usize,

    /// Hop length between frames (in samples)
    pub hop_length: usize,

    /// Number of mel bands feeding the DCT
    pub n_mels: usize,

    /// Minimum frequency for mel filterbank (Hz)
    pub fmin: f32,

    /// Maximum frequency for mel filterbank (Hz)
    pub fmax: f32,

    /// Dynamic range kept in the log-mel spectrogram (dB below peak)
    pub mel_top_db: f32,

    /// Frames quieter than this many dB below the loudest frame are silent
    pub silence_top_db: f32,

    /// Lowest frequency considered by the pitch tracker (Hz)
    pub pitch_fmin: f32,

    /// Upper (exclusive) frequency considered by the pitch tracker (Hz)
    pub pitch_fmax: f32,

    /// Peaks below this fraction of the frame maximum are ignored
    pub pitch_threshold: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sample_rate: TARGET_SAMPLE_RATE,
            n_fft: 2048,
            hop_length: 512,
            n_mels: 128,
            fmin: 0.0,
            fmax: TARGET_SAMPLE_RATE as f32 / 2.0,
            mel_top_db: 80.0,
            silence_top_db: 20.0,
            pitch_fmin: 150.0,
            pitch_fmax: 4000.0,
            pitch_threshold: 0.1,
        }
    }
}

impl FeatureConfig {
    /// Number of FFT bins (n_fft/2 + 1)
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }
}
