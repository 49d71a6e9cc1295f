use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;
use crate::shared::validation_error::ValidationError;

use super::domain::detection_result::{face_filename, DetectedFace, DetectionResult};
use super::domain::face_detector::{DetectorError, FaceDetector};

/// Turns raw detector output for a transformed frame into a [`DetectionResult`].
///
/// Per box: coordinates are truncated to integers and clamped to the frame;
/// boxes that are non-finite or empty after clamping are dropped with a
/// warning. `person_index` is the box's position in the detector's output, so
/// a dropped box leaves a gap rather than renumbering the rest.
pub struct DetectionAdapter {
    detector: Box<dyn FaceDetector>,
    min_confidence: Option<f64>,
}

impl DetectionAdapter {
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self {
            detector,
            min_confidence: None,
        }
    }

    /// Drops boxes scoring below `threshold` (in `[0, 1]`).
    pub fn with_min_confidence(mut self, threshold: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ValidationError::InvalidConfidence(threshold));
        }
        self.min_confidence = Some(threshold);
        Ok(self)
    }

    pub fn detect(&mut self, frame: &Frame) -> Result<DetectionResult, DetectorError> {
        let frame_index = frame.index();
        let raw = self.detector.detect(frame)?;

        let mut faces = Vec::with_capacity(raw.len());
        for (person_index, scored) in raw.into_iter().enumerate() {
            if self.min_confidence.is_some_and(|min| scored.confidence < min) {
                continue;
            }
            let Some(bbox) = BoundingBox::clamped(scored.coords, frame.width(), frame.height()) else {
                log::warn!(
                    "Frame {frame_index}: dropping invalid box {:?} from detector (frame is {}x{})",
                    scored.coords,
                    frame.width(),
                    frame.height()
                );
                continue;
            };
            let image = frame.sub_frame(bbox.x1(), bbox.y1(), bbox.x2(), bbox.y2());
            faces.push(DetectedFace {
                person_index,
                bbox,
                confidence: scored.confidence,
                image,
                filename: face_filename(frame_index, person_index),
            });
        }

        Ok(DetectionResult { frame_index, faces })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_detector::ScoredBox;
    use std::sync::{Arc, Mutex};

    struct StubDetector {
        boxes: Vec<ScoredBox>,
        seen: Arc<Mutex<Vec<usize>>>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, frame: &Frame) -> Result<Vec<ScoredBox>, DetectorError> {
            self.seen.lock().unwrap().push(frame.index());
            Ok(self.boxes.clone())
        }
    }

    struct FailingDetector(DetectorError);

    impl FaceDetector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<ScoredBox>, DetectorError> {
            Err(self.0.clone())
        }
    }

    fn adapter(boxes: Vec<ScoredBox>) -> DetectionAdapter {
        DetectionAdapter::new(Box::new(StubDetector {
            boxes,
            seen: Arc::new(Mutex::new(Vec::new())),
        }))
    }

    fn frame(index: usize) -> Frame {
        Frame::filled(100, 60, 3, 10).with_index(index)
    }

    #[test]
    fn test_no_boxes_is_empty_result() {
        let result = adapter(vec![]).detect(&frame(5)).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.frame_index, 5);
    }

    #[test]
    fn test_builds_crops_and_filenames_in_detector_order() {
        let mut a = adapter(vec![
            ScoredBox::new(50.0, 10.0, 70.0, 40.0, 0.6),
            ScoredBox::new(0.0, 0.0, 10.0, 20.0, 0.9),
        ]);
        let result = a.detect(&frame(7)).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.faces[0].filename, "face_frame0007_person00.jpg");
        assert_eq!(result.faces[1].filename, "face_frame0007_person01.jpg");
        assert_eq!(result.faces[0].bbox, BoundingBox::new(50, 10, 70, 40).unwrap());
        assert_eq!((result.faces[0].image.width(), result.faces[0].image.height()), (20, 30));
        assert_eq!((result.faces[1].image.width(), result.faces[1].image.height()), (10, 20));
        assert_eq!(result.faces[1].confidence, 0.9);
    }

    #[test]
    fn test_truncates_fractional_coordinates() {
        let result = adapter(vec![ScoredBox::new(10.9, 5.2, 30.7, 25.99, 0.8)])
            .detect(&frame(1))
            .unwrap();
        assert_eq!(result.faces[0].bbox, BoundingBox::new(10, 5, 30, 25).unwrap());
    }

    #[test]
    fn test_clamps_boxes_to_frame() {
        let result = adapter(vec![ScoredBox::new(-15.0, -3.0, 140.0, 90.0, 0.8)])
            .detect(&frame(1))
            .unwrap();
        let bbox = result.faces[0].bbox;
        assert_eq!(bbox, BoundingBox::new(0, 0, 100, 60).unwrap());
        assert!(bbox.fits_within(100, 60));
    }

    #[test]
    fn test_drops_degenerate_boxes_keeping_person_positions() {
        let mut a = adapter(vec![
            ScoredBox::new(30.0, 30.0, 30.0, 40.0, 0.9),    // zero width
            ScoredBox::new(120.0, 10.0, 150.0, 20.0, 0.9),  // outside frame
            ScoredBox::new(f64::NAN, 0.0, 10.0, 10.0, 0.9), // garbage
            ScoredBox::new(40.0, 30.0, 20.0, 50.0, 0.9),    // inverted
            ScoredBox::new(1.0, 1.0, 5.0, 5.0, 0.9),
        ]);
        let result = a.detect(&frame(3)).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.faces[0].person_index, 4);
        assert_eq!(result.faces[0].filename, "face_frame0003_person04.jpg");
    }

    #[test]
    fn test_every_box_is_non_empty() {
        let boxes = (0..20)
            .map(|i| {
                let v = i as f64 * 7.0 - 20.0;
                ScoredBox::new(v, v / 2.0, v + 15.0, v / 2.0 + 3.0, 0.5)
            })
            .collect();
        let result = adapter(boxes).detect(&frame(1)).unwrap();
        for face in &result.faces {
            assert!(face.bbox.x1() < face.bbox.x2());
            assert!(face.bbox.y1() < face.bbox.y2());
            assert!(face.bbox.fits_within(100, 60));
            assert_eq!(face.image.width(), face.bbox.width());
            assert_eq!(face.image.height(), face.bbox.height());
        }
    }

    #[test]
    fn test_min_confidence_filters() {
        let mut a = adapter(vec![
            ScoredBox::new(0.0, 0.0, 10.0, 10.0, 0.2),
            ScoredBox::new(0.0, 0.0, 10.0, 10.0, 0.7),
        ])
        .with_min_confidence(0.5)
        .unwrap();
        let result = a.detect(&frame(2)).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.faces[0].person_index, 1);
    }

    #[test]
    fn test_rejects_out_of_range_confidence() {
        assert!(matches!(
            adapter(vec![]).with_min_confidence(1.5),
            Err(ValidationError::InvalidConfidence(_))
        ));
    }

    #[test]
    fn test_detector_errors_pass_through() {
        let mut a = DetectionAdapter::new(Box::new(FailingDetector(DetectorError::Unavailable(
            "503".to_string(),
        ))));
        let err = a.detect(&frame(1)).unwrap_err();
        assert!(err.is_transient());

        let mut a = DetectionAdapter::new(Box::new(FailingDetector(DetectorError::Failed("bad model".to_string()))));
        assert!(!a.detect(&frame(1)).unwrap_err().is_transient());
    }

    #[test]
    fn test_detector_sees_transformed_frame_index() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut a = DetectionAdapter::new(Box::new(StubDetector {
            boxes: vec![],
            seen: seen.clone(),
        }));
        a.detect(&frame(15)).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![15]);
    }
}
