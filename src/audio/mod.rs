pub mod decode;
pub mod resampler;
pub mod signal;

pub use decode::{decode_wav_bytes, load_wav};
pub use resampler::{resample_to_target, TARGET_SAMPLE_RATE};
pub use signal::AudioSignal;
