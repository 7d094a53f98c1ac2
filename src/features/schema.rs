//! Feature vector layout shared by the extractor and the classifier adapter.
//!
//! The classifier was trained on vectors in exactly this order, so any change
//! here invalidates its predictions.

use serde::{Serialize, Serializer};

/// Number of MFCC coefficients averaged into the vector
pub const N_MFCC: usize = 40;

/// Scalar features preceding the MFCC block, in vector order
pub const SCALAR_FEATURES: [&str; 3] = ["rms_energy", "mean_pitch", "speaking_rate"];

/// Total feature vector length
pub const FEATURE_LEN: usize = SCALAR_FEATURES.len() + N_MFCC;

pub const RMS_ENERGY: usize = 0;
pub const MEAN_PITCH: usize = 1;
pub const SPEAKING_RATE: usize = 2;
pub const MFCC_OFFSET: usize = SCALAR_FEATURES.len();

const _: () = assert!(FEATURE_LEN == 43);

/// Name of every position in the vector (`mfcc_0` .. `mfcc_39` after the scalars)
pub fn feature_names() -> Vec<String> {
    SCALAR_FEATURES
        .iter()
        .map(|name| name.to_string())
        .chain((0..N_MFCC).map(|i| format!("mfcc_{}", i)))
        .collect()
}

/// Fixed-length acoustic descriptor of one recording
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; FEATURE_LEN]);

impl FeatureVector {
    /// Assemble the vector in classifier order
    pub fn from_parts(
        rms_energy: f32,
        mean_pitch: f32,
        speaking_rate: f32,
        mfcc_means: &[f32; N_MFCC],
    ) -> Self {
        let mut values = [0.0f32; FEATURE_LEN];
        values[RMS_ENERGY] = rms_energy;
        values[MEAN_PITCH] = mean_pitch;
        values[SPEAKING_RATE] = speaking_rate;
        values[MFCC_OFFSET..].copy_from_slice(mfcc_means);
        Self(values)
    }

    pub fn from_array(values: [f32; FEATURE_LEN]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn rms_energy(&self) -> f32 {
        self.0[RMS_ENERGY]
    }

    pub fn mean_pitch(&self) -> f32 {
        self.0[MEAN_PITCH]
    }

    pub fn speaking_rate(&self) -> f32 {
        self.0[SPEAKING_RATE]
    }

    /// MFCC means, coefficient 0 first
    pub fn mfcc(&self) -> &[f32] {
        &self.0[MFCC_OFFSET..]
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}
