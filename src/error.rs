//! Error kinds surfaced by the analysis pipeline.

use thiserror::Error;

/// Errors that can occur while analyzing a recording
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Audio bytes could not be decoded or resampled
    #[error("Failed to decode audio: {0}")]
    DecodeError(String),

    /// Signal has zero duration, so no per-second rate can be computed
    #[error("Audio signal is empty (zero duration)")]
    EmptySignalError,

    /// Classifier could not be loaded at startup
    #[error("Classifier unavailable: {0}")]
    ModelUnavailableError(String),

    /// Classifier failed or broke its output shape contract
    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Feature not enabled: classifier inference requires the 'onnx' feature")]
    FeatureNotEnabled,
}

impl AnalysisError {
    /// Whether this error prevents the process from serving any request
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnalysisError::ModelUnavailableError(_) | AnalysisError::FeatureNotEnabled
        )
    }
}

impl From<hound::Error> for AnalysisError {
    fn from(e: hound::Error) -> Self {
        AnalysisError::DecodeError(e.to_string())
    }
}
