//! Emotion labels and classifier result normalization.
//!
//! The classifier emits one row of eight values: seven unnormalized scores in
//! [`Emotion::ALL`] order followed by a confidence value in [0, 1]. This module
//! turns that row into a percentage distribution and a Low/Medium/High tier.

mod labels;
mod normalizer;
mod result;

pub use labels::Emotion;
pub use normalizer::{normalize, RawModelOutput, RAW_OUTPUT_LEN};
pub use result::{ConfidenceLevel, ConfidenceResult, EmotionDistribution, PredictionResult};
