use crate::shared::frame::Frame;
use crate::shared::validation_error::ValidationError;
use crate::transform::domain::transform_stage::{TransformError, TransformStage};

/// Keeps rows `h1..h2` and columns `w1..w2` (half-open).
///
/// Bounds that exceed the incoming frame are rejected, not clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropStage {
    h1: u32,
    h2: u32,
    w1: u32,
    w2: u32,
}

impl CropStage {
    pub fn new(h1: u32, h2: u32, w1: u32, w2: u32) -> Result<Self, ValidationError> {
        if h1 >= h2 || w1 >= w2 {
            return Err(ValidationError::EmptyRoi { h1, h2, w1, w2 });
        }
        Ok(Self { h1, h2, w1, w2 })
    }

    /// Output dimensions as `(width, height)`.
    pub fn output_size(&self) -> (u32, u32) {
        (self.w2 - self.w1, self.h2 - self.h1)
    }
}

impl TransformStage for CropStage {
    fn name(&self) -> &'static str {
        "crop"
    }

    fn apply(&self, frame: Frame) -> Result<Frame, TransformError> {
        if self.h2 > frame.height() || self.w2 > frame.width() {
            return Err(TransformError::CropOutOfBounds {
                h1: self.h1,
                h2: self.h2,
                w1: self.w1,
                w2: self.w2,
                width: frame.width(),
                height: frame.height(),
            });
        }
        if self.h1 == 0 && self.w1 == 0 && self.h2 == frame.height() && self.w2 == frame.width() {
            return Ok(frame);
        }
        Ok(frame.sub_frame(self.w1, self.h1, self.w2, self.h2))
    }
}
