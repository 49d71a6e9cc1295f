use std::time::Duration;

use crate::shared::validation_error::ValidationError;

/// Positional decimation: frame `i` (1-based) is eligible iff `i % every_n == 0`.
///
/// Every successfully read frame advances the index, sampled or not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSampler {
    every_n: usize,
}

impl FrameSampler {
    pub fn new(every_n: usize) -> Result<Self, ValidationError> {
        if every_n == 0 {
            return Err(ValidationError::NonPositiveStride(every_n));
        }
        Ok(Self { every_n })
    }

    /// Samples every frame.
    pub fn every_frame() -> Self {
        Self { every_n: 1 }
    }

    pub fn every_n(&self) -> usize {
        self.every_n
    }

    pub fn is_eligible(&self, frame_index: usize) -> bool {
        frame_index % self.every_n == 0
    }

    /// Delay between iterations that keeps sampled frames at roughly the
    /// stream's rate: `1 / floor(fps / every_n)` seconds.
    ///
    /// `None` when the stream rate is unknown or slower than the stride.
    pub fn pacing_for(&self, fps: f64) -> Option<Duration> {
        if !fps.is_finite() || fps <= 0.0 {
            return None;
        }
        let sampled_per_sec = (fps / self.every_n as f64).floor();
        if sampled_per_sec < 1.0 {
            return None;
        }
        Some(Duration::from_secs_f64(1.0 / sampled_per_sec))
    }
}

/// Stateless form of [`FrameSampler::is_eligible`].
pub fn is_eligible(frame_index: usize, every_n: usize) -> Result<bool, ValidationError> {
    Ok(FrameSampler::new(every_n)?.is_eligible(frame_index))
}
