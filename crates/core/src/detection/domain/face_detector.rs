use thiserror::Error;

use crate::shared::frame::Frame;

/// A raw detection in floating-point pixel coordinates `[x1, y1, x2, y2]` of
/// the frame passed to the detector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredBox {
    pub coords: [f64; 4],
    pub confidence: f64,
}

impl ScoredBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f64) -> Self {
        Self {
            coords: [x1, y1, x2, y2],
            confidence,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectorError {
    /// The backend is temporarily unreachable or overloaded; the frame can be skipped.
    #[error("detector unavailable: {0}")]
    Unavailable(String),
    /// The detector cannot work at all (bad model, malformed responses).
    #[error("detector failed: {0}")]
    Failed(String),
}

impl DetectorError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Domain interface for face detection.
///
/// Boxes come back in the detector's own order, which downstream naming
/// relies on. `&mut self` lets implementations keep per-stream state.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<ScoredBox>, DetectorError>;
}
