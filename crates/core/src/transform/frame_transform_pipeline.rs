use crate::shared::frame::Frame;

use super::domain::transform_stage::{TransformError, TransformStage};

/// An ordered chain of transform stages, applied strictly left to right.
///
/// With no stages the pipeline is the identity.
pub struct FrameTransformPipeline {
    stages: Vec<Box<dyn TransformStage>>,
}

impl FrameTransformPipeline {
    pub fn new(stages: Vec<Box<dyn TransformStage>>) -> Self {
        Self { stages }
    }

    pub fn identity() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn apply(&self, frame: Frame) -> Result<Frame, TransformError> {
        self.stages.iter().try_fold(frame, |frame, stage| stage.apply(frame))
    }
}

impl Default for FrameTransformPipeline {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for FrameTransformPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameTransformPipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
