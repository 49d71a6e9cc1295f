use std::path::PathBuf;

use thiserror::Error;

use crate::detection::domain::face_detector::DetectorError;
use crate::display::domain::frame_display::DisplayError;
use crate::shared::model_resolver::ModelResolveError;
use crate::shared::validation_error::ValidationError;
use crate::sink::domain::result_sink::PersistenceError;
use crate::stream::domain::video_stream::ReadError;
use crate::stream::stream_connector::ConnectionError;
use crate::transform::domain::transform_stage::TransformError;

/// Everything the orchestration layer can report to its caller.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Display(#[from] DisplayError),
    #[error(transparent)]
    Model(#[from] ModelResolveError),
    #[error("cannot load config {path}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("failed to initialize {component}: {message}")]
    Setup { component: &'static str, message: String },
    #[error("stream ended after {frames_read} frame(s) without an eligible frame")]
    NoEligibleFrame { frames_read: usize },
    #[error("capture thread panicked")]
    WorkerPanicked,
}

impl PipelineError {
    pub(crate) fn setup(component: &'static str, err: impl std::fmt::Display) -> Self {
        PipelineError::Setup {
            component,
            message: err.to_string(),
        }
    }
}
