use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::display::domain::frame_display::{DisplayError, FrameDisplay};
use crate::shared::frame::Frame;

const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(500);

/// Keeps a single image file updated with the most recent frame.
///
/// Writes at most once per `min_interval`. Each write goes to a sibling
/// temporary file that is then renamed over the target, so a viewer polling
/// the file never sees a partial image. The format follows the extension.
pub struct SnapshotFileDisplay {
    path: PathBuf,
    min_interval: Duration,
    last_write: Option<Instant>,
    writes: usize,
}

impl SnapshotFileDisplay {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_interval(path, DEFAULT_MIN_INTERVAL)
    }

    pub fn with_interval(path: impl Into<PathBuf>, min_interval: Duration) -> Self {
        Self {
            path: path.into(),
            min_interval,
            last_write: None,
            writes: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    fn write(&self, frame: &Frame) -> Result<(), DisplayError> {
        let image = frame
            .to_dynamic_image()
            .ok_or(DisplayError::UnsupportedChannels(frame.channels()))?;
        let format = image::ImageFormat::from_path(&self.path)?;
        let temp_path = self.path.with_extension("part");
        image.save_with_format(&temp_path, format)?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| DisplayError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl FrameDisplay for SnapshotFileDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        if let Some(last) = self.last_write {
            if last.elapsed() < self.min_interval {
                return Ok(());
            }
        }
        self.write(frame)?;
        self.last_write = Some(Instant::now());
        self.writes += 1;
        Ok(())
    }

    fn close(&mut self) {
        log::debug!("Preview {} written {} time(s)", self.path.display(), self.writes);
    }
}
