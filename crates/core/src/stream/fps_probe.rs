use std::time::{Duration, Instant};

use super::domain::video_stream::ReadError;
use super::stream_handle::StreamHandle;

/// Declared versus observed frame rate of a stream.
#[derive(Clone, Debug, PartialEq)]
pub struct FpsMeasurement {
    pub declared_fps: f64,
    pub frames_read: usize,
    pub elapsed: Duration,
    pub measured_fps: f64,
}

/// Reads up to `num_frames` frames and times them.
///
/// Stops early at end of stream. Live cameras often declare no rate (or a
/// wrong one), so this is the number to trust when picking a sampling stride.
pub fn measure_fps(handle: &mut StreamHandle, num_frames: usize) -> Result<FpsMeasurement, ReadError> {
    let start = Instant::now();
    let mut frames_read = 0;
    while frames_read < num_frames {
        if handle.read()?.is_none() {
            break;
        }
        frames_read += 1;
    }
    let elapsed = start.elapsed();

    let secs = elapsed.as_secs_f64();
    let measured_fps = if frames_read > 0 && secs > 0.0 {
        frames_read as f64 / secs
    } else {
        0.0
    };
    log::info!(
        "Read {frames_read} frames in {secs:.2}s: measured {measured_fps:.2} fps, declared {:.2} fps",
        handle.fps()
    );

    Ok(FpsMeasurement {
        declared_fps: handle.fps(),
        frames_read,
        elapsed,
        measured_fps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;
    use crate::shared::stream_metadata::StreamMetadata;
    use crate::stream::domain::video_stream::VideoStream;

    struct PacedStream {
        metadata: StreamMetadata,
        remaining: usize,
        interval: Duration,
        fail: bool,
    }

    impl VideoStream for PacedStream {
        fn is_opened(&self) -> bool {
            true
        }

        fn metadata(&self) -> &StreamMetadata {
            &self.metadata
        }

        fn read(&mut self) -> Result<Option<Frame>, ReadError> {
            if self.fail {
                return Err(ReadError::Disconnected("reset by peer".to_string()));
            }
            if self.remaining == 0 {
                return Ok(None);
            }
            self.remaining -= 1;
            std::thread::sleep(self.interval);
            Ok(Some(Frame::filled(2, 2, 3, 0)))
        }

        fn close(&mut self) {}
    }

    fn handle(remaining: usize, interval: Duration, fail: bool) -> StreamHandle {
        StreamHandle::new(Box::new(PacedStream {
            metadata: StreamMetadata {
                width: 2,
                height: 2,
                fps: 30.0,
                codec: "raw".to_string(),
                source: "test://paced".to_string(),
            },
            remaining,
            interval,
            fail,
        }))
    }

    #[test]
    fn test_measures_requested_frames() {
        let mut h = handle(100, Duration::from_millis(5), false);
        let m = measure_fps(&mut h, 10).unwrap();
        assert_eq!(m.frames_read, 10);
        assert_eq!(m.declared_fps, 30.0);
        assert!(m.elapsed >= Duration::from_millis(50));
        // At most one frame per 5ms.
        assert!(m.measured_fps > 0.0 && m.measured_fps <= 200.0);
    }

    #[test]
    fn test_stops_at_end_of_stream() {
        let mut h = handle(3, Duration::ZERO, false);
        let m = measure_fps(&mut h, 10).unwrap();
        assert_eq!(m.frames_read, 3);
    }

    #[test]
    fn test_no_frames_reports_zero() {
        let mut h = handle(0, Duration::ZERO, false);
        let m = measure_fps(&mut h, 10).unwrap();
        assert_eq!(m.frames_read, 0);
        assert_eq!(m.measured_fps, 0.0);
    }

    #[test]
    fn test_read_failure_propagates() {
        let mut h = handle(5, Duration::ZERO, true);
        assert!(matches!(measure_fps(&mut h, 5), Err(ReadError::Disconnected(_))));
    }
}
