use std::path::PathBuf;

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("cannot display a frame with {0} channel(s)")]
    UnsupportedChannels(u8),
    #[error("failed to write preview to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode preview: {0}")]
    Encode(#[from] image::ImageError),
}

/// Somewhere to show the transformed frames of a running loop.
///
/// Display failures are reported to the loop, which logs them and keeps
/// going; a broken preview never stops capture.
pub trait FrameDisplay: Send {
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError>;

    fn close(&mut self) {}
}
