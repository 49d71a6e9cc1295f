use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::FACE_FILENAME_EXTENSION;
use crate::shared::frame::Frame;

/// File name for the crop of one detected person in one frame.
///
/// `face_frame{frame:04}_person{person:02}.jpg`; wider numbers are not
/// truncated.
pub fn face_filename(frame_index: usize, person_index: usize) -> String {
    format!("face_frame{frame_index:04}_person{person_index:02}.{FACE_FILENAME_EXTENSION}")
}

/// One face found in an eligible frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedFace {
    pub person_index: usize,
    pub bbox: BoundingBox,
    pub confidence: f64,
    pub image: Frame,
    pub filename: String,
}

/// Everything detected in one eligible frame, in detector order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionResult {
    pub frame_index: usize,
    pub faces: Vec<DetectedFace>,
}

impl DetectionResult {
    pub fn empty(frame_index: usize) -> Self {
        Self {
            frame_index,
            faces: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn boxes(&self) -> Vec<BoundingBox> {
        self.faces.iter().map(|f| f.bbox).collect()
    }
}
