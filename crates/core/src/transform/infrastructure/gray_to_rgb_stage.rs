use crate::shared::frame::Frame;
use crate::transform::domain::transform_stage::{TransformError, TransformStage};

/// Promotes a single-channel frame to RGB by triplicating the channel.
///
/// Three-channel frames pass through untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrayToRgbStage;

impl GrayToRgbStage {
    pub fn new() -> Self {
        Self
    }
}

impl TransformStage for GrayToRgbStage {
    fn name(&self) -> &'static str {
        "gray_to_rgb"
    }

    fn apply(&self, frame: Frame) -> Result<Frame, TransformError> {
        match frame.channels() {
            3 => Ok(frame),
            1 => match frame.to_dynamic_image() {
                Some(gray) => Ok(Frame::from_rgb_image(gray.to_rgb8(), frame.index())),
                None => Err(TransformError::EmptyOutput {
                    stage: self.name(),
                    width: frame.width(),
                    height: frame.height(),
                }),
            },
            channels => Err(TransformError::UnsupportedChannels {
                stage: self.name(),
                channels,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triplicates_gray() {
        let frame = Frame::new(vec![0, 100, 200, 255], 2, 2, 1, 3);
        let out = GrayToRgbStage::new().apply(frame).unwrap();
        assert_eq!(out.channels(), 3);
        assert_eq!(out.index(), 3);
        assert_eq!(out.data(), &[0, 0, 0, 100, 100, 100, 200, 200, 200, 255, 255, 255]);
    }

    #[test]
    fn test_rgb_passes_through() {
        let frame = Frame::new((0..12).collect(), 2, 2, 3, 0);
        assert_eq!(GrayToRgbStage::new().apply(frame.clone()).unwrap(), frame);
    }

    #[test]
    fn test_rejects_two_channels() {
        assert!(GrayToRgbStage::new().apply(Frame::filled(1, 1, 2, 0)).is_err());
    }
}
