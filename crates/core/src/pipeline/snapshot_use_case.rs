use std::path::Path;

use crate::display::domain::frame_display::DisplayError;
use crate::sampling::frame_sampler::FrameSampler;
use crate::shared::frame::Frame;
use crate::stream::stream_connector::StreamConnector;
use crate::transform::frame_transform_pipeline::FrameTransformPipeline;

use super::pipeline_error::PipelineError;

/// Grabs a single transformed frame, for checking ROI and thresholds on a
/// camera before starting a long-running capture.
///
/// Frames before the first eligible one are read and discarded without
/// being transformed.
pub struct SnapshotUseCase {
    connector: StreamConnector,
    pipeline: FrameTransformPipeline,
    sampler: FrameSampler,
}

impl SnapshotUseCase {
    pub fn new(connector: StreamConnector, pipeline: FrameTransformPipeline, sampler: FrameSampler) -> Self {
        Self {
            connector,
            pipeline,
            sampler,
        }
    }

    pub fn capture(&mut self, source: &str) -> Result<Frame, PipelineError> {
        let mut handle = self.connector.connect(source)?;
        let mut frames_read = 0;
        let frame = loop {
            let Some(raw) = handle.read()? else {
                return Err(PipelineError::NoEligibleFrame { frames_read });
            };
            frames_read += 1;
            if self.sampler.is_eligible(frames_read) {
                break raw.with_index(frames_read);
            }
        };
        handle.release();
        Ok(self.pipeline.apply(frame)?)
    }

    /// Captures and writes the frame; the format follows the extension.
    pub fn capture_to_file(&mut self, source: &str, path: &Path) -> Result<Frame, PipelineError> {
        let frame = self.capture(source)?;
        let image = frame
            .to_dynamic_image()
            .ok_or(DisplayError::UnsupportedChannels(frame.channels()))?;
        image.save(path).map_err(DisplayError::Encode)?;
        log::info!(
            "Saved frame {} ({}x{}) to {}",
            frame.index(),
            frame.width(),
            frame.height(),
            path.display()
        );
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::stream_metadata::StreamMetadata;
    use crate::stream::domain::stream_opener::{OpenError, StreamOpener};
    use crate::stream::domain::video_stream::{ReadError, VideoStream};
    use crate::stream::stream_connector::RetryPolicy;
    use crate::transform::infrastructure::scale_stage::ScaleStage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Frame `i` is filled with the value `i`.
    struct CountingStream {
        metadata: StreamMetadata,
        limit: usize,
        served: usize,
        closes: Arc<AtomicUsize>,
    }

    impl VideoStream for CountingStream {
        fn is_opened(&self) -> bool {
            true
        }

        fn metadata(&self) -> &StreamMetadata {
            &self.metadata
        }

        fn read(&mut self) -> Result<Option<Frame>, ReadError> {
            if self.served == self.limit {
                return Ok(None);
            }
            self.served += 1;
            Ok(Some(Frame::filled(20, 10, 3, self.served as u8)))
        }

        fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Opener {
        limit: usize,
        closes: Arc<AtomicUsize>,
    }

    impl StreamOpener for Opener {
        fn open(&mut self, source: &str) -> Result<Box<dyn VideoStream>, OpenError> {
            Ok(Box::new(CountingStream {
                metadata: StreamMetadata {
                    width: 20,
                    height: 10,
                    fps: 25.0,
                    codec: "raw".to_string(),
                    source: source.to_string(),
                },
                limit: self.limit,
                served: 0,
                closes: self.closes.clone(),
            }))
        }
    }

    fn use_case(limit: usize, every_n: usize) -> (SnapshotUseCase, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        let connector = StreamConnector::new(
            Box::new(Opener {
                limit,
                closes: closes.clone(),
            }),
            RetryPolicy::fixed(1, Duration::ZERO).unwrap(),
        );
        let pipeline = FrameTransformPipeline::new(vec![Box::new(ScaleStage::new(0.5).unwrap())]);
        (
            SnapshotUseCase::new(connector, pipeline, FrameSampler::new(every_n).unwrap()),
            closes,
        )
    }

    #[test]
    fn test_returns_first_eligible_frame_transformed() {
        let (mut snapshot, closes) = use_case(12, 5);
        let frame = snapshot.capture("rtsp://cam").unwrap();

        assert_eq!(frame.index(), 5);
        assert_eq!((frame.width(), frame.height()), (10, 5));
        assert!(frame.data().iter().all(|&v| v.abs_diff(5) <= 1));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_short_stream_has_no_eligible_frame() {
        let (mut snapshot, closes) = use_case(3, 5);
        let err = snapshot.capture("rtsp://cam").unwrap_err();
        assert!(matches!(err, PipelineError::NoEligibleFrame { frames_read: 3 }));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_writes_image_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snapshot.png");
        let (mut snapshot, _) = use_case(5, 1);

        snapshot.capture_to_file("rtsp://cam", &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (10, 5));
    }
}
