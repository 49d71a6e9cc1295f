use crate::shared::constants::{DEFAULT_CANNY_HIGH, DEFAULT_CANNY_LOW};
use crate::shared::frame::Frame;
use crate::shared::validation_error::ValidationError;
use crate::transform::domain::transform_stage::{TransformError, TransformStage};

/// Canny edge extraction with two-threshold hysteresis.
///
/// Color input is first reduced to luma. The output is a single-channel
/// edge map (0 or 255).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CannyStage {
    low: f32,
    high: f32,
}

impl CannyStage {
    pub fn new(low: f32, high: f32) -> Result<Self, ValidationError> {
        if !low.is_finite() || !high.is_finite() || low < 0.0 || low > high {
            return Err(ValidationError::InvalidEdgeThresholds { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn thresholds(&self) -> (f32, f32) {
        (self.low, self.high)
    }
}

impl Default for CannyStage {
    fn default() -> Self {
        Self {
            low: DEFAULT_CANNY_LOW,
            high: DEFAULT_CANNY_HIGH,
        }
    }
}

impl TransformStage for CannyStage {
    fn name(&self) -> &'static str {
        "canny"
    }

    fn apply(&self, frame: Frame) -> Result<Frame, TransformError> {
        let gray = frame
            .to_dynamic_image()
            .ok_or(TransformError::UnsupportedChannels {
                stage: self.name(),
                channels: frame.channels(),
            })?
            .to_luma8();
        let edges = imageproc::edges::canny(&gray, self.low, self.high);
        Ok(Frame::from_gray_image(edges, frame.index()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dark left half, bright right half.
    fn step_frame(width: u32, height: u32, channels: u8) -> Frame {
        let mut frame = Frame::filled(width, height, channels, 0);
        let c = channels as usize;
        let w = width as usize;
        for (i, px) in frame.data_mut().iter_mut().enumerate() {
            if (i / c) % w >= w / 2 {
                *px = 255;
            }
        }
        frame
    }

    #[test]
    fn test_output_is_single_channel_same_size() {
        let out = CannyStage::default().apply(step_frame(32, 24, 3).with_index(12)).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (32, 24, 1));
        assert_eq!(out.index(), 12);
    }

    #[test]
    fn test_finds_vertical_step_edge() {
        let out = CannyStage::default().apply(step_frame(32, 24, 3)).unwrap();
        let px = out.as_ndarray();
        let row = 12;
        let edge_cols: Vec<usize> = (0..32).filter(|&x| px[[row, x, 0]] == 255).collect();
        assert!(!edge_cols.is_empty());
        assert!(edge_cols.iter().all(|&x| (14..=17).contains(&x)));
    }

    #[test]
    fn test_uniform_frame_has_no_edges() {
        let out = CannyStage::default().apply(Frame::filled(16, 16, 3, 128)).unwrap();
        assert!(out.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_color_and_gray_inputs_agree() {
        let from_rgb = CannyStage::default().apply(step_frame(24, 16, 3)).unwrap();
        let from_gray = CannyStage::default().apply(step_frame(24, 16, 1)).unwrap();
        assert_eq!(from_rgb.data(), from_gray.data());
    }

    #[test]
    fn test_accepts_gray_input() {
        let out = CannyStage::default().apply(step_frame(16, 16, 1)).unwrap();
        assert_eq!(out.channels(), 1);
        assert!(out.data().iter().any(|&v| v == 255));
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        assert_eq!(
            CannyStage::new(200.0, 100.0),
            Err(ValidationError::InvalidEdgeThresholds { low: 200.0, high: 100.0 })
        );
        assert!(CannyStage::new(-1.0, 10.0).is_err());
    }

    #[test]
    fn test_rejects_four_channels() {
        let err = CannyStage::default().apply(Frame::filled(2, 2, 4, 0)).unwrap_err();
        assert_eq!(
            err,
            TransformError::UnsupportedChannels {
                stage: "canny",
                channels: 4
            }
        );
    }
}
