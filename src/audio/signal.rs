use super::resampler::{resample_to_target, TARGET_SAMPLE_RATE};
use crate::error::AnalysisError;

/// Mono audio samples with their sampling rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioSignal {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (0.0 for an empty signal or a zero rate)
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Convert to the 16kHz analysis rate, resampling if needed
    pub fn into_target_rate(self) -> Result<Self, AnalysisError> {
        if self.sample_rate == TARGET_SAMPLE_RATE {
            return Ok(self);
        }
        let samples = resample_to_target(&self.samples, self.sample_rate)?;
        Ok(Self::new(samples, TARGET_SAMPLE_RATE))
    }
}
