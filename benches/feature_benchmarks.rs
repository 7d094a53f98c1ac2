use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use speech_emotion::audio::resample_to_target;
use speech_emotion::{AudioSignal, FeatureExtractor};

fn speech_like(sample_rate: u32, seconds: f32) -> Vec<f32> {
    let n = (sample_rate as f32 * seconds) as usize;
    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let f1 = (2.0 * std::f32::consts::PI * 200.0 * t).sin() * 0.3;
            let f2 = (2.0 * std::f32::consts::PI * 500.0 * t).sin() * 0.2;
            let f3 = (2.0 * std::f32::consts::PI * 1500.0 * t).sin() * 0.1;
            // 4 Hz syllable envelope
            let envelope = (2.0 * std::f32::consts::PI * 4.0 * t).sin().abs();
            (f1 + f2 + f3) * envelope
        })
        .collect()
}

fn benchmark_extract_durations(c: &mut Criterion) {
    let mut group = c.benchmark_group("Feature extraction 16kHz");
    let extractor = FeatureExtractor::default();

    for seconds in [1u32, 3, 10].iter() {
        let samples = speech_like(16000, *seconds as f32);
        group.bench_with_input(BenchmarkId::new("seconds", seconds), &samples, |b, samples| {
            b.iter(|| {
                let signal = AudioSignal::new(samples.clone(), 16000);
                let _ = black_box(extractor.extract(black_box(signal)));
            });
        });
    }

    group.finish();
}

fn benchmark_extract_with_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("Feature extraction with resampling");
    let extractor = FeatureExtractor::default();

    for rate in [22050u32, 44100, 48000].iter() {
        let samples = speech_like(*rate, 3.0);
        group.bench_with_input(BenchmarkId::new("rate", rate), &samples, |b, samples| {
            b.iter(|| {
                let signal = AudioSignal::new(samples.clone(), *rate);
                let _ = black_box(extractor.extract(black_box(signal)));
            });
        });
    }

    group.finish();
}

fn benchmark_resample_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("Offline resampling to 16kHz");

    for rate in [8000u32, 22050, 44100, 48000, 96000].iter() {
        let samples = speech_like(*rate, 3.0);
        group.bench_with_input(BenchmarkId::new("rate", rate), &samples, |b, samples| {
            b.iter(|| {
                let _ = black_box(resample_to_target(black_box(samples), *rate));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_extract_durations,
    benchmark_extract_with_resample,
    benchmark_resample_only
);
criterion_main!(benches);
