//! Boundary to the pretrained emotion classifier.
//!
//! The classifier is a capability ([`Classifier`]): anything that maps a batch
//! of feature rows `[n, 43]` to output rows `[n, 8]`. [`InferenceAdapter`]
//! wraps a shared classifier, batches a single [`FeatureVector`] and enforces
//! the output shape contract.

pub mod onnx;

use ndarray::{Array2, ArrayView2};
use std::sync::Arc;
use tracing::{debug, error};

use crate::emotion::{RawModelOutput, RAW_OUTPUT_LEN};
use crate::error::AnalysisError;
use crate::features::{FeatureVector, FEATURE_LEN};

pub use onnx::OnnxClassifier;

/// A trained classifier over feature batches
pub trait Classifier: Send + Sync {
    /// Predict one output row per input row
    fn predict(&self, batch: ArrayView2<'_, f32>) -> Result<Array2<f32>, AnalysisError>;

    /// Short description for logs
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Single-vector front end to a shared classifier
#[derive(Clone)]
pub struct InferenceAdapter {
    classifier: Arc<dyn Classifier>,
}

impl InferenceAdapter {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Run the classifier on one feature vector.
    ///
    /// Fails with `InferenceError` if the classifier fails or does not return
    /// exactly one row of eight values.
    pub fn infer(&self, features: &FeatureVector) -> Result<RawModelOutput, AnalysisError> {
        let batch = ArrayView2::from_shape((1, FEATURE_LEN), features.as_slice())
            .map_err(|e| AnalysisError::InferenceError(e.to_string()))?;

        let output = self.classifier.predict(batch)?;

        if output.shape() != [1, RAW_OUTPUT_LEN] {
            error!(
                "Classifier '{}' violated the output contract: shape {:?} (expected [1, {}])",
                self.classifier.name(),
                output.shape(),
                RAW_OUTPUT_LEN
            );
            return Err(AnalysisError::InferenceError(format!(
                "Expected output shape [1, {}], got {:?}",
                RAW_OUTPUT_LEN,
                output.shape()
            )));
        }

        let row: Vec<f32> = output.row(0).iter().copied().collect();
        debug!("Raw classifier output: {:?}", row);
        RawModelOutput::from_slice(&row)
    }
}
