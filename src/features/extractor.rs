//! Feature extractor: audio signal → 43-value feature vector.

use tracing::debug;

use super::config::FeatureConfig;
use super::energy::{mean_rms, speaking_rate};
use super::mfcc::MfccCalculator;
use super::pitch::PitchTracker;
use super::schema::FeatureVector;
use super::spectrum::FrameAnalyzer;
use crate::audio::AudioSignal;
use crate::error::AnalysisError;

/// Feature extractor with pre-computed filterbank, DCT basis and FFT plan.
///
/// Holds no per-call state, so one instance can be shared across threads.
pub struct FeatureExtractor {
    config: FeatureConfig,
    frames: FrameAnalyzer,
    mfcc: MfccCalculator,
    pitch: PitchTracker,
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> Self {
        let frames = FrameAnalyzer::new(&config);
        let mfcc = MfccCalculator::new(&config);
        let pitch = PitchTracker::new(&config);
        Self {
            config,
            frames,
            mfcc,
            pitch,
        }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Extract the feature vector of a recording.
    ///
    /// The signal is resampled to the analysis rate first. Fails with
    /// `EmptySignalError` for zero-duration input and `DecodeError` if the
    /// signal cannot be resampled or holds non-finite samples.
    pub fn extract(&self, signal: AudioSignal) -> Result<FeatureVector, AnalysisError> {
        if signal.is_empty() {
            return Err(AnalysisError::EmptySignalError);
        }

        let signal = if signal.sample_rate() == self.config.sample_rate {
            signal
        } else {
            let samples =
                crate::audio::resample_to_target(signal.samples(), signal.sample_rate())?;
            AudioSignal::new(samples, self.config.sample_rate)
        };

        let duration_secs = signal.duration_secs();
        if duration_secs <= 0.0 {
            return Err(AnalysisError::EmptySignalError);
        }
        if signal.samples().iter().any(|s| !s.is_finite()) {
            return Err(AnalysisError::DecodeError(
                "Signal contains non-finite samples".to_string(),
            ));
        }

        let analysis = self.frames.analyze(signal.samples())?;

        let rms_energy = mean_rms(&analysis.frame_rms);
        let mean_pitch = self.pitch.mean_pitch(&analysis.magnitudes);
        let speaking_rate = speaking_rate(
            &analysis.frame_rms,
            self.config.silence_top_db,
            duration_secs,
        );
        let mfcc_means = self.mfcc.mean_mfcc(&analysis.magnitudes);

        debug!(
            "Extracted features from {:.2}s ({} frames): rms={:.4} pitch={:.1}Hz rate={:.2}/s mfcc0={:.2}",
            duration_secs,
            analysis.n_frames(),
            rms_energy,
            mean_pitch,
            speaking_rate,
            mfcc_means[0]
        );

        Ok(FeatureVector::from_parts(
            rms_energy,
            mean_pitch,
            speaking_rate,
            &mfcc_means,
        ))
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(FeatureConfig::default())
    }
}
