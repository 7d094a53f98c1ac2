//! Acoustic feature extraction.
//!
//! Converts a recording into the fixed 43-value descriptor the emotion
//! classifier was trained on:
//! 1. Resample to 16kHz mono
//! 2. Centered STFT (2048-point, hop 512) and per-frame RMS
//! 3. Mean RMS energy, mean spectral-peak pitch, non-silent segments per second
//! 4. 40 MFCC coefficients averaged over all frames

pub mod config;
pub mod energy;
pub mod extractor;
pub mod mfcc;
pub mod pitch;
pub mod schema;
pub mod spectrum;

pub use config::FeatureConfig;
pub use extractor::FeatureExtractor;
pub use schema::{feature_names, FeatureVector, FEATURE_LEN, N_MFCC};
