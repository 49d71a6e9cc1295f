/// Properties of an opened stream as reported by the decoder.
///
/// `fps` is 0.0 when the container does not declare a frame rate, which is
/// common for live RTSP feeds.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub codec: String,
    pub source: String,
}

impl StreamMetadata {
    pub fn has_known_fps(&self) -> bool {
        self.fps.is_finite() && self.fps > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(fps: f64) -> StreamMetadata {
        StreamMetadata {
            width: 2592,
            height: 1920,
            fps,
            codec: "h264".to_string(),
            source: "rtsp://camera.local/stream".to_string(),
        }
    }

    #[test]
    fn test_construction() {
        let meta = metadata(25.0);
        assert_eq!(meta.width, 2592);
        assert_eq!(meta.height, 1920);
        assert_eq!(meta.codec, "h264");
        assert_eq!(meta.source, "rtsp://camera.local/stream");
    }

    #[test]
    fn test_known_fps() {
        assert!(metadata(25.0).has_known_fps());
    }

    #[test]
    fn test_unknown_fps() {
        assert!(!metadata(0.0).has_known_fps());
        assert!(!metadata(f64::NAN).has_known_fps());
    }
}
