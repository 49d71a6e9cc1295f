use std::path::{Path, PathBuf};

use crate::detection::domain::detection_result::DetectionResult;
use crate::shared::jpeg::{encode_jpeg, DEFAULT_JPEG_QUALITY};
use crate::sink::domain::result_sink::{PersistenceError, ResultSink};

/// Writes each face crop to `{dir}/{filename}` as JPEG.
///
/// The directory is created on first use. Existing files with the same name
/// are overwritten.
pub struct FilesystemSink {
    dir: PathBuf,
    quality: u8,
}

impl FilesystemSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ResultSink for FilesystemSink {
    fn store(&mut self, result: &DetectionResult) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| PersistenceError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        for face in &result.faces {
            let bytes = encode_jpeg(&face.image, self.quality).map_err(|e| PersistenceError::Encode {
                filename: face.filename.clone(),
                source: e,
            })?;
            let path = self.dir.join(&face.filename);
            std::fs::write(&path, bytes).map_err(|e| PersistenceError::Io { path, source: e })?;
        }
        log::debug!(
            "Saved {} face(s) from frame {} to {}",
            result.len(),
            result.frame_index,
            self.dir.display()
        );
        Ok(())
    }
}
