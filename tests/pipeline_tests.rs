//! End-to-end pipeline tests with an in-process classifier.

use hound::{SampleFormat, WavSpec, WavWriter};
use ndarray::{Array2, ArrayView2};
use std::f32::consts::PI;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use speech_emotion::features::{feature_names, FEATURE_LEN};
use speech_emotion::{
    AnalysisError, AudioSignal, Classifier, ConfidenceLevel, Emotion, EmotionAnalyzer,
};

/// Scores "happy" by pitch and reports louder audio as more confident,
/// which lets the tests check the features reached the classifier in order.
struct ProbeClassifier {
    calls: AtomicUsize,
}

impl ProbeClassifier {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl Classifier for ProbeClassifier {
    fn predict(&self, batch: ArrayView2<'_, f32>) -> Result<Array2<f32>, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(batch.ncols(), FEATURE_LEN);

        let mut output = Array2::zeros((batch.nrows(), 8));
        for (i, row) in batch.rows().into_iter().enumerate() {
            let rms = row[0];
            let pitch = row[1];
            if pitch > 0.0 {
                output[[i, 2]] = 0.8; // happy
                output[[i, 0]] = 0.2; // neutral
            }
            output[[i, 7]] = (rms * 2.0).min(1.0);
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        "probe"
    }
}

/// Emits a row of the wrong width
struct TruncatingClassifier;

impl Classifier for TruncatingClassifier {
    fn predict(&self, batch: ArrayView2<'_, f32>) -> Result<Array2<f32>, AnalysisError> {
        Ok(Array2::zeros((batch.nrows(), 7)))
    }
}

fn generate_sine(freq: f32, sample_rate: u32, duration_ms: u32, amplitude: f32) -> Vec<f32> {
    let num_samples = (sample_rate * duration_ms / 1000) as usize;
    (0..num_samples)
        .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin() * amplitude)
        .collect()
}

fn wav_bytes(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample((s * 32767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[test]
fn test_wav_upload_end_to_end() {
    let classifier = Arc::new(ProbeClassifier::new());
    let analyzer = EmotionAnalyzer::new(classifier.clone());

    let bytes = wav_bytes(&generate_sine(220.0, 44100, 1500, 0.5), 44100);
    let result = analyzer.analyze_bytes(&bytes).unwrap();

    assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    assert_eq!(result.emotions.get(Emotion::Happy), 80.0);
    assert_eq!(result.emotions.get(Emotion::Neutral), 20.0);
    assert_eq!(result.emotions.primary(), Some(Emotion::Happy));
    // RMS of a 0.5 sine is ~0.35, doubled to a confidence of ~0.7
    assert!(result.confidence_score() > 60.0 && result.confidence_score() < 75.0);
}

#[test]
fn test_silent_upload() {
    let analyzer = EmotionAnalyzer::new(Arc::new(ProbeClassifier::new()));

    let bytes = wav_bytes(&vec![0.0; 16000], 16000);
    let result = analyzer.analyze_bytes(&bytes).unwrap();

    for (_, percent) in result.emotions.iter() {
        assert_eq!(percent, 0.0);
    }
    assert_eq!(result.emotions.primary(), None);
    assert_eq!(result.confidence_score(), 0.0);
    assert_eq!(result.confidence_level(), ConfidenceLevel::Low);
}

#[test]
fn test_empty_upload_is_empty_signal_error() {
    let classifier = Arc::new(ProbeClassifier::new());
    let analyzer = EmotionAnalyzer::new(classifier.clone());

    let result = analyzer.analyze_bytes(&wav_bytes(&[], 16000));
    assert!(matches!(result, Err(AnalysisError::EmptySignalError)));
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_shape_violation_is_inference_error() {
    let analyzer = EmotionAnalyzer::new(Arc::new(TruncatingClassifier));
    let signal = AudioSignal::new(generate_sine(300.0, 16000, 500, 0.4), 16000);
    let result = analyzer.analyze_signal(signal);
    assert!(matches!(result, Err(AnalysisError::InferenceError(_))));
}

#[test]
fn test_feature_vector_layout() {
    let analyzer = EmotionAnalyzer::new(Arc::new(ProbeClassifier::new()));
    let signal = AudioSignal::new(generate_sine(440.0, 16000, 1000, 0.5), 16000);
    let features = analyzer.extract_features(signal).unwrap();

    assert_eq!(features.as_slice().len(), 43);
    assert_eq!(feature_names().len(), 43);
    assert_eq!(features.as_slice()[0], features.rms_energy());
    assert_eq!(features.as_slice()[1], features.mean_pitch());
    assert_eq!(features.as_slice()[2], features.speaking_rate());
    assert_eq!(&features.as_slice()[3..], features.mfcc());
}

#[test]
fn test_result_json_shape() {
    let analyzer = EmotionAnalyzer::new(Arc::new(ProbeClassifier::new()));
    let signal = AudioSignal::new(generate_sine(250.0, 16000, 800, 0.5), 16000);
    let result = analyzer.analyze_signal(signal).unwrap();

    let json = serde_json::to_value(result).unwrap();
    let emotions = json["emotions"].as_object().unwrap();
    let labels: Vec<&str> = emotions.keys().map(|k| k.as_str()).collect();
    let mut expected: Vec<&str> = Emotion::ALL.iter().map(|e| e.label()).collect();
    let mut sorted_labels = labels.clone();
    sorted_labels.sort_unstable();
    expected.sort_unstable();
    assert_eq!(sorted_labels, expected);
    assert!(json["confidence_score"].is_number());
    assert!(["Low", "Medium", "High"].contains(&json["confidence_level"].as_str().unwrap()));
}

#[test]
fn test_concurrent_requests_share_classifier() {
    let classifier = Arc::new(ProbeClassifier::new());
    let analyzer = Arc::new(EmotionAnalyzer::new(classifier.clone()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let analyzer = Arc::clone(&analyzer);
            std::thread::spawn(move || {
                let signal =
                    AudioSignal::new(generate_sine(200.0 + 50.0 * i as f32, 16000, 500, 0.4), 16000);
                analyzer.analyze_signal(signal)
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap().unwrap();
        assert_eq!(result.emotions.get(Emotion::Happy), 80.0);
    }
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 4);
}
