//! End-to-end analysis: audio → features → classifier → normalized result.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::audio::{decode_wav_bytes, load_wav, AudioSignal};
use crate::config::AnalyzerConfig;
use crate::emotion::{normalize, PredictionResult};
use crate::error::AnalysisError;
use crate::features::{FeatureConfig, FeatureExtractor, FeatureVector};
use crate::inference::{Classifier, InferenceAdapter, OnnxClassifier};

/// Owns the feature extractor and a shared classifier.
///
/// Every call is independent; the analyzer can be shared across threads.
pub struct EmotionAnalyzer {
    extractor: FeatureExtractor,
    adapter: InferenceAdapter,
}

impl EmotionAnalyzer {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self::with_feature_config(classifier, FeatureConfig::default())
    }

    pub fn with_feature_config(classifier: Arc<dyn Classifier>, config: FeatureConfig) -> Self {
        Self {
            extractor: FeatureExtractor::new(config),
            adapter: InferenceAdapter::new(classifier),
        }
    }

    /// Load the ONNX classifier named by the config
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, AnalysisError> {
        let model_path = config
            .get_model_path()
            .map_err(|e| AnalysisError::ModelUnavailableError(e.to_string()))?;
        let classifier = OnnxClassifier::load(&model_path, config.n_threads)?;
        Ok(Self::new(Arc::new(classifier)))
    }

    /// Analyze an uploaded WAV file held in memory
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<PredictionResult, AnalysisError> {
        debug!("Analyzing {} bytes of uploaded audio", bytes.len());
        let signal = decode_wav_bytes(bytes)?;
        self.analyze_signal(signal)
    }

    /// Analyze a WAV file on disk
    pub fn analyze_file(&self, path: &Path) -> Result<PredictionResult, AnalysisError> {
        debug!("Analyzing {:?}", path);
        let signal = load_wav(path)?;
        self.analyze_signal(signal)
    }

    /// Analyze a decoded signal at any sample rate
    pub fn analyze_signal(&self, signal: AudioSignal) -> Result<PredictionResult, AnalysisError> {
        let duration_secs = signal.duration_secs();
        let features = self.extract_features(signal)?;
        let raw = self.adapter.infer(&features)?;
        let result = normalize(raw);

        info!(
            "Analyzed {:.2}s of audio: primary={} confidence={:.2} ({})",
            duration_secs,
            result
                .emotions
                .primary()
                .map(|e| e.label())
                .unwrap_or("none"),
            result.confidence_score(),
            result.confidence_level()
        );

        Ok(result)
    }

    pub fn extract_features(&self, signal: AudioSignal) -> Result<FeatureVector, AnalysisError> {
        self.extractor.extract(signal)
    }
}
