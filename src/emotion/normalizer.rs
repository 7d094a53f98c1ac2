//! Classifier output → percentage distribution and confidence tier.

use tracing::warn;

use super::labels::Emotion;
use super::result::{ConfidenceResult, EmotionDistribution, PredictionResult};
use crate::error::AnalysisError;

/// Classifier output width: one score per emotion plus a confidence value
pub const RAW_OUTPUT_LEN: usize = Emotion::COUNT + 1;

/// One row of classifier output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawModelOutput([f32; RAW_OUTPUT_LEN]);

impl RawModelOutput {
    pub fn new(values: [f32; RAW_OUTPUT_LEN]) -> Self {
        Self(values)
    }

    /// Wrap a classifier row, enforcing the 8-value shape contract
    pub fn from_slice(values: &[f32]) -> Result<Self, AnalysisError> {
        let array: [f32; RAW_OUTPUT_LEN] = values.try_into().map_err(|_| {
            AnalysisError::InferenceError(format!(
                "Expected {} output values, got {}",
                RAW_OUTPUT_LEN,
                values.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Unnormalized per-emotion scores in label order
    pub fn emotion_scores(&self) -> &[f32] {
        &self.0[..Emotion::COUNT]
    }

    /// Raw confidence, nominally in [0, 1]
    pub fn confidence(&self) -> f32 {
        self.0[Emotion::COUNT]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Normalize one classifier row into the caller-visible result.
///
/// Emotion scores become percentages rescaled to sum to 100 (unless they are
/// all zero, in which case they stay zero). Negative or non-finite scores
/// count as zero; the confidence value is clamped into [0, 1] first.
pub fn normalize(raw: RawModelOutput) -> PredictionResult {
    let mut percentages = [0.0f64; Emotion::COUNT];
    for (percent, &score) in percentages.iter_mut().zip(raw.emotion_scores()) {
        *percent = round2(sanitize_score(score) * 100.0);
    }

    let total: f64 = percentages.iter().sum();
    if total > 0.0 {
        for percent in percentages.iter_mut() {
            *percent = round2(*percent / total * 100.0);
        }
        absorb_rounding_drift(&mut percentages);
    }

    let confidence = sanitize_confidence(raw.confidence());
    PredictionResult {
        emotions: EmotionDistribution::from_percentages(percentages),
        confidence: ConfidenceResult::from_score(round2(confidence * 100.0)),
    }
}

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Largest drift from 100 that per-value rounding may leave in place
const MAX_ROUNDING_DRIFT: f64 = 0.02;

/// Move excess rounding drift onto the largest percentage.
///
/// Seven values rounded independently can miss 100 by up to 0.035. Anything
/// beyond `MAX_ROUNDING_DRIFT` is folded into the largest value, which is at
/// least 100/7 and so stays positive.
fn absorb_rounding_drift(percentages: &mut [f64; Emotion::COUNT]) {
    let drift = round2(100.0 - percentages.iter().sum::<f64>());
    if drift.abs() <= MAX_ROUNDING_DRIFT {
        return;
    }
    let largest = percentages
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i);
    if let Some(i) = largest {
        percentages[i] = round2(percentages[i] + drift);
    }
}

fn sanitize_score(score: f32) -> f64 {
    if !score.is_finite() || score < 0.0 {
        warn!("Clamping out-of-range emotion score {} to 0", score);
        return 0.0;
    }
    score as f64
}

fn sanitize_confidence(confidence: f32) -> f64 {
    if !confidence.is_finite() {
        warn!("Non-finite confidence {} treated as 0", confidence);
        return 0.0;
    }
    if !(0.0..=1.0).contains(&confidence) {
        warn!("Clamping out-of-range confidence {} into [0, 1]", confidence);
    }
    (confidence as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::ConfidenceLevel;
    use proptest::prelude::*;

    fn raw(scores: [f32; 7], confidence: f32) -> RawModelOutput {
        let mut values = [0.0f32; RAW_OUTPUT_LEN];
        values[..7].copy_from_slice(&scores);
        values[7] = confidence;
        RawModelOutput::new(values)
    }

    #[test]
    fn test_all_zero_scores_stay_zero() {
        let result = normalize(raw([0.0; 7], 0.85));
        for (_, percent) in result.emotions.iter() {
            assert_eq!(percent, 0.0);
        }
        assert_eq!(result.confidence_score(), 85.0);
        assert_eq!(result.confidence_level(), ConfidenceLevel::High);
    }

    #[test]
    fn test_single_positive_score() {
        let result = normalize(raw([0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.4));
        assert_eq!(result.emotions.get(Emotion::Neutral), 100.0);
        for emotion in &Emotion::ALL[1..] {
            assert_eq!(result.emotions.get(*emotion), 0.0);
        }
        assert_eq!(result.confidence_score(), 40.0);
        assert_eq!(result.confidence_level(), ConfidenceLevel::Low);
    }

    #[test]
    fn test_confidence_boundaries() {
        let at_70 = normalize(raw([0.1; 7], 0.70));
        assert_eq!(at_70.confidence_score(), 70.0);
        assert_eq!(at_70.confidence_level(), ConfidenceLevel::Medium);

        let above_70 = normalize(raw([0.1; 7], 0.7001));
        assert_eq!(above_70.confidence_score(), 70.01);
        assert_eq!(above_70.confidence_level(), ConfidenceLevel::High);
    }

    #[test]
    fn test_rescales_to_hundred() {
        let result = normalize(raw([0.1, 0.1, 0.2, 0.0, 0.0, 0.0, 0.1], 0.9));
        assert_eq!(result.emotions.get(Emotion::Neutral), 20.0);
        assert_eq!(result.emotions.get(Emotion::Calm), 20.0);
        assert_eq!(result.emotions.get(Emotion::Happy), 40.0);
        assert_eq!(result.emotions.get(Emotion::Disgust), 20.0);
        assert!((result.emotions.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_thirds_round_per_value() {
        let result = normalize(raw([0.3, 0.3, 0.3, 0.0, 0.0, 0.0, 0.0], 0.5));
        assert_eq!(result.emotions.get(Emotion::Neutral), 33.33);
        assert!((result.emotions.total() - 99.99).abs() < 1e-9);
    }

    #[test]
    fn test_large_rounding_drift_absorbed() {
        // 100/7 rounded up seven times overshoots by 0.03
        let mut percentages = [14.29; 7];
        absorb_rounding_drift(&mut percentages);
        let total: f64 = percentages.iter().sum();
        assert!((total - 100.0).abs() <= 0.02 + 1e-9, "total = {}", total);
        assert!(percentages.iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn test_small_rounding_drift_kept() {
        let mut percentages = [33.33, 33.33, 33.33, 0.0, 0.0, 0.0, 0.0];
        absorb_rounding_drift(&mut percentages);
        assert_eq!(percentages, [33.33, 33.33, 33.33, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_negative_scores_clamped() {
        let result = normalize(raw([-0.5, 0.25, 0.0, 0.0, 0.0, 0.0, 0.25], 0.5));
        assert_eq!(result.emotions.get(Emotion::Neutral), 0.0);
        assert_eq!(result.emotions.get(Emotion::Calm), 50.0);
        assert_eq!(result.emotions.get(Emotion::Disgust), 50.0);
    }

    #[test]
    fn test_non_finite_values() {
        let result = normalize(raw([f32::NAN, 1.0, 0.0, 0.0, 0.0, 0.0, f32::INFINITY], f32::NAN));
        assert_eq!(result.emotions.get(Emotion::Neutral), 0.0);
        assert_eq!(result.emotions.get(Emotion::Calm), 100.0);
        assert_eq!(result.emotions.get(Emotion::Disgust), 0.0);
        assert_eq!(result.confidence_score(), 0.0);
        assert_eq!(result.confidence_level(), ConfidenceLevel::Low);
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(normalize(raw([0.0; 7], 1.7)).confidence_score(), 100.0);
        assert_eq!(normalize(raw([0.0; 7], -0.2)).confidence_score(), 0.0);
    }

    #[test]
    fn test_from_slice_shape_contract() {
        assert!(RawModelOutput::from_slice(&[0.0; 8]).is_ok());
        assert!(matches!(
            RawModelOutput::from_slice(&[0.0; 7]),
            Err(AnalysisError::InferenceError(_))
        ));
        assert!(matches!(
            RawModelOutput::from_slice(&[0.0; 9]),
            Err(AnalysisError::InferenceError(_))
        ));
    }

    #[test]
    fn test_accessors() {
        let output = raw([0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7], 0.8);
        assert_eq!(output.emotion_scores().len(), 7);
        assert_eq!(output.emotion_scores()[6], 0.7);
        assert_eq!(output.confidence(), 0.8);
        assert_eq!(output.as_slice().len(), RAW_OUTPUT_LEN);
    }

    proptest! {
        #[test]
        fn prop_positive_sum_normalizes_to_hundred(
            scores in proptest::array::uniform7(0.0f32..1.0),
            confidence in 0.0f32..1.0
        ) {
            prop_assume!(scores.iter().any(|&s| s >= 0.0001));
            let result = normalize(raw(scores, confidence));

            prop_assert!((result.emotions.total() - 100.0).abs() <= 0.02 + 1e-9);
            for (_, percent) in result.emotions.iter() {
                prop_assert!(percent >= 0.0);
            }
        }

        #[test]
        fn prop_normalize_is_pure(
            scores in proptest::array::uniform7(-1.0f32..2.0),
            confidence in -1.0f32..2.0
        ) {
            let output = raw(scores, confidence);
            prop_assert_eq!(normalize(output), normalize(output));
        }

        #[test]
        fn prop_confidence_in_range(confidence in proptest::num::f32::ANY) {
            let result = normalize(raw([0.0; 7], confidence));
            prop_assert!((0.0..=100.0).contains(&result.confidence_score()));
        }
    }
}
