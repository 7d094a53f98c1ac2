//! Speech emotion analysis.
//!
//! Extracts a fixed 43-value acoustic descriptor from a short recording, runs
//! it through a pretrained classifier and normalizes the classifier output
//! into an emotion percentage distribution plus a confidence tier.
//!
//! ```text
//! WAV bytes ─► decode ─► resample 16kHz ─► FeatureExtractor ─► [1, 43]
//!                                                                 │
//!                                                        InferenceAdapter
//!                                                                 │
//!            PredictionResult ◄── normalize ◄── [1, 8] ◄──────────┘
//! ```

pub mod analyzer;
pub mod audio;
pub mod config;
pub mod emotion;
pub mod error;
pub mod features;
pub mod inference;

pub use analyzer::EmotionAnalyzer;
pub use audio::{AudioSignal, TARGET_SAMPLE_RATE};
pub use config::AnalyzerConfig;
pub use emotion::{
    normalize, ConfidenceLevel, ConfidenceResult, Emotion, EmotionDistribution, PredictionResult,
    RawModelOutput,
};
pub use error::AnalysisError;
pub use features::{FeatureConfig, FeatureExtractor, FeatureVector};
pub use inference::{Classifier, InferenceAdapter, OnnxClassifier};
