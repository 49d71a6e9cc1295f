use thiserror::Error;

use crate::shared::frame::Frame;

/// A frame did not meet a stage's preconditions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("crop rows {h1}..{h2}, columns {w1}..{w2} exceed frame {width}x{height}")]
    CropOutOfBounds {
        h1: u32,
        h2: u32,
        w1: u32,
        w2: u32,
        width: u32,
        height: u32,
    },
    #[error("{stage} would produce an empty frame from {width}x{height}")]
    EmptyOutput {
        stage: &'static str,
        width: u32,
        height: u32,
    },
    #[error("{stage} does not support {channels}-channel frames")]
    UnsupportedChannels { stage: &'static str, channels: u8 },
    #[error("{stage} resize failed: {message}")]
    Resize { stage: &'static str, message: String },
}

/// One step of a [`FrameTransformPipeline`](crate::transform::frame_transform_pipeline::FrameTransformPipeline).
///
/// Parameters are fixed at construction; `apply` is a pure function of its
/// input frame and must keep the frame index.
pub trait TransformStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, frame: Frame) -> Result<Frame, TransformError>;
}
