//! Mel-frequency cepstral coefficients.
//!
//! Power spectrum → Slaney mel filterbank → dB (80 dB dynamic range) →
//! orthonormal DCT-II. Coefficients are averaged over all frames.

use super::config::FeatureConfig;
use super::schema::N_MFCC;

/// Frequency below which the Slaney mel scale is linear (Hz)
const MIN_LOG_HZ: f32 = 1000.0;

/// Hz per mel in the linear region
const F_SP: f32 = 200.0 / 3.0;

/// Floor applied to mel power before taking the log
const POWER_FLOOR: f32 = 1e-10;

/// One triangular filter, stored as its non-zero span
#[derive(Debug, Clone)]
struct MelFilter {
    first_bin: usize,
    weights: Vec<f32>,
}

impl MelFilter {
    fn apply(&self, power_spec: &[f32]) -> f32 {
        self.weights
            .iter()
            .zip(&power_spec[self.first_bin..])
            .map(|(w, p)| w * p)
            .sum()
    }
}

/// MFCC calculator with pre-computed filterbank and DCT basis
pub struct MfccCalculator {
    mel_filterbank: Vec<MelFilter>,
    dct_basis: Vec<Vec<f32>>,
    top_db: f32,
}

impl MfccCalculator {
    pub fn new(config: &FeatureConfig) -> Self {
        let dense = create_mel_filterbank(
            config.n_mels,
            config.n_fft,
            config.sample_rate as f32,
            config.fmin,
            config.fmax,
        );

        let mel_filterbank = dense
            .into_iter()
            .map(|filter| {
                let first = filter.iter().position(|&w| w > 0.0).unwrap_or(0);
                let last = filter.iter().rposition(|&w| w > 0.0).unwrap_or(0);
                let weights = if last >= first {
                    filter[first..=last].to_vec()
                } else {
                    Vec::new()
                };
                MelFilter {
                    first_bin: first,
                    weights,
                }
            })
            .collect();

        Self {
            mel_filterbank,
            dct_basis: create_dct_basis(N_MFCC, config.n_mels),
            top_db: config.mel_top_db,
        }
    }

    /// Mean of each MFCC coefficient across all frames
    pub fn mean_mfcc(&self, magnitudes: &[Vec<f32>]) -> [f32; N_MFCC] {
        let mut means = [0.0f32; N_MFCC];
        if magnitudes.is_empty() {
            return means;
        }

        let log_mel = self.log_mel_spectrogram(magnitudes);

        let mut sums = [0.0f64; N_MFCC];
        for frame in &log_mel {
            for (sum, basis) in sums.iter_mut().zip(&self.dct_basis) {
                let coeff: f32 = basis.iter().zip(frame).map(|(b, x)| b * x).sum();
                *sum += coeff as f64;
            }
        }

        let n_frames = log_mel.len() as f64;
        for (mean, sum) in means.iter_mut().zip(sums) {
            *mean = (sum / n_frames) as f32;
        }
        means
    }

    /// Log-mel spectrogram in dB, clipped to `top_db` below its global peak
    fn log_mel_spectrogram(&self, magnitudes: &[Vec<f32>]) -> Vec<Vec<f32>> {
        let mut log_mel: Vec<Vec<f32>> = magnitudes
            .iter()
            .map(|frame| {
                let power_spec: Vec<f32> = frame.iter().map(|m| m * m).collect();
                self.mel_filterbank
                    .iter()
                    .map(|filter| 10.0 * filter.apply(&power_spec).max(POWER_FLOOR).log10())
                    .collect()
            })
            .collect();

        let peak = log_mel
            .iter()
            .flat_map(|frame| frame.iter().copied())
            .fold(f32::NEG_INFINITY, f32::max);
        let floor = peak - self.top_db;
        for value in log_mel.iter_mut().flat_map(|frame| frame.iter_mut()) {
            *value = value.max(floor);
        }

        log_mel
    }
}

/// Convert frequency to the Slaney mel scale
fn hz_to_mel(hz: f32) -> f32 {
    if hz >= MIN_LOG_HZ {
        let min_log_mel = MIN_LOG_HZ / F_SP;
        min_log_mel + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Convert Slaney mel scale to frequency
fn mel_to_hz(mel: f32) -> f32 {
    let min_log_mel = MIN_LOG_HZ / F_SP;
    if mel >= min_log_mel {
        MIN_LOG_HZ * (log_step() * (mel - min_log_mel)).exp()
    } else {
        mel * F_SP
    }
}

fn log_step() -> f32 {
    6.4f32.ln() / 27.0
}

/// Create an area-normalized (Slaney) mel filterbank
///
/// Returns `n_mels` filters of `n_fft/2 + 1` weights each.
fn create_mel_filterbank(
    n_mels: usize,
    n_fft: usize,
    sample_rate: f32,
    fmin: f32,
    fmax: f32,
) -> Vec<Vec<f32>> {
    let n_bins = n_fft / 2 + 1;
    let fft_freqs: Vec<f32> = (0..n_bins)
        .map(|k| k as f32 * sample_rate / n_fft as f32)
        .collect();

    // n_mels + 2 band edges equally spaced in mel
    let mel_min = hz_to_mel(fmin);
    let mel_max = hz_to_mel(fmax);
    let hz_points: Vec<f32> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f32 / (n_mels + 1) as f32))
        .collect();

    (0..n_mels)
        .map(|i| {
            let (left, center, right) = (hz_points[i], hz_points[i + 1], hz_points[i + 2]);
            let norm = 2.0 / (right - left);
            fft_freqs
                .iter()
                .map(|&f| {
                    let rising = (f - left) / (center - left);
                    let falling = (right - f) / (right - center);
                    rising.min(falling).max(0.0) * norm
                })
                .collect()
        })
        .collect()
}

/// Orthonormal DCT-II basis, `n_out` rows of `n_in` weights
fn create_dct_basis(n_out: usize, n_in: usize) -> Vec<Vec<f32>> {
    let n = n_in as f64;
    (0..n_out)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (0..n_in)
                .map(|i| {
                    let angle = std::f64::consts::PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n);
                    (scale * angle.cos()) as f32
                })
                .collect()
        })
        .collect()
}
