use std::path::PathBuf;

use thiserror::Error;

use crate::detection::domain::detection_result::DetectionResult;

/// A detection result could not be stored. Never fatal for a capture loop.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {filename}: {source}")]
    Encode {
        filename: String,
        #[source]
        source: image::ImageError,
    },
    #[error("embedding failed for {filename}: {message}")]
    Embedding { filename: String, message: String },
    #[error("storage service failed for {filename}: {message}")]
    Service { filename: String, message: String },
    #[error("result queue is full, dropped frame {0}")]
    QueueFull(usize),
    #[error("result writer has stopped")]
    Disconnected,
    #[error("{} sink(s) failed", .0.len())]
    Multiple(Vec<PersistenceError>),
}

/// Destination for detection results.
///
/// `store` is called once per eligible frame that has at least one face, in
/// frame order. `close` flushes anything buffered; the loop calls it exactly
/// once while draining.
pub trait ResultSink: Send {
    fn store(&mut self, result: &DetectionResult) -> Result<(), PersistenceError>;

    fn close(&mut self) -> Result<(), PersistenceError> {
        Ok(())
    }
}
