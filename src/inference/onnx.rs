//! ONNX Runtime classifier backend.
//!
//! The session is loaded once and shared by every request. Calls into it are
//! serialized with a single mutex, so one classifier can serve concurrent
//! analyses.

use ndarray::{Array2, ArrayView2};
use std::path::Path;

#[cfg(feature = "onnx")]
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Value,
};
#[cfg(feature = "onnx")]
use std::path::PathBuf;
#[cfg(feature = "onnx")]
use std::sync::Mutex;

use super::Classifier;
use crate::error::AnalysisError;

/// Emotion classifier exported to ONNX
#[cfg(feature = "onnx")]
pub struct OnnxClassifier {
    session: Mutex<Session>,
    model_path: PathBuf,
}

#[cfg(feature = "onnx")]
impl OnnxClassifier {
    /// Load the model; failure here means the process cannot serve requests
    pub fn load(model_path: &Path, n_threads: usize) -> Result<Self, AnalysisError> {
        if !model_path.exists() {
            return Err(AnalysisError::ModelUnavailableError(format!(
                "Model not found at {:?}",
                model_path
            )));
        }

        let session = Session::builder()
            .map_err(|e: ort::Error| AnalysisError::ModelUnavailableError(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e: ort::Error| AnalysisError::ModelUnavailableError(e.to_string()))?
            .with_intra_threads(n_threads.max(1))
            .map_err(|e: ort::Error| AnalysisError::ModelUnavailableError(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e: ort::Error| AnalysisError::ModelUnavailableError(e.to_string()))?;

        tracing::info!("Emotion classifier loaded from {:?}", model_path);

        Ok(Self {
            session: Mutex::new(session),
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

#[cfg(feature = "onnx")]
impl Classifier for OnnxClassifier {
    fn predict(&self, batch: ArrayView2<'_, f32>) -> Result<Array2<f32>, AnalysisError> {
        let (rows, cols) = batch.dim();
        let input_data: Vec<f32> = batch.iter().copied().collect();

        let input_tensor = Value::from_array(([rows, cols], input_data))
            .map_err(|e: ort::Error| AnalysisError::InferenceError(e.to_string()))?;

        let mut session = self.session.lock().map_err(|_| {
            AnalysisError::InferenceError("Classifier session lock poisoned".to_string())
        })?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e: ort::Error| AnalysisError::InferenceError(e.to_string()))?;

        let output = outputs
            .iter()
            .next()
            .ok_or_else(|| AnalysisError::InferenceError("No output from model".to_string()))?;

        let (shape, data) = output
            .1
            .try_extract_tensor::<f32>()
            .map_err(|e: ort::Error| AnalysisError::InferenceError(e.to_string()))?;

        let dims: Vec<usize> = shape.iter().map(|&d| d.max(0) as usize).collect();
        let (out_rows, out_cols) = match dims.as_slice() {
            [] => (1, data.len()),
            [n] => (1, *n),
            [n, rest @ ..] => (*n, rest.iter().product()),
        };

        let predictions = Array2::from_shape_vec((out_rows, out_cols), data.to_vec())
            .map_err(|e| AnalysisError::InferenceError(format!("Malformed output tensor: {}", e)))?;
        Ok(predictions)
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

// Stub implementation when feature is not enabled
#[cfg(not(feature = "onnx"))]
pub struct OnnxClassifier;

#[cfg(not(feature = "onnx"))]
impl OnnxClassifier {
    pub fn load(_model_path: &Path, _n_threads: usize) -> Result<Self, AnalysisError> {
        Err(AnalysisError::FeatureNotEnabled)
    }

    pub fn model_path(&self) -> &Path {
        Path::new("")
    }
}

#[cfg(not(feature = "onnx"))]
impl Classifier for OnnxClassifier {
    fn predict(&self, _batch: ArrayView2<'_, f32>) -> Result<Array2<f32>, AnalysisError> {
        Err(AnalysisError::FeatureNotEnabled)
    }
}
