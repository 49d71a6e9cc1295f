use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;

/// A frame could not be read from an open stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadError {
    #[error("stream disconnected: {0}")]
    Disconnected(String),
    #[error("frame decode failed: {0}")]
    Decode(String),
    #[error("stream is closed")]
    Closed,
}

/// A live, pull-based source of decoded frames.
///
/// `read` returns `Ok(None)` at end of stream. Frames come back with index 0;
/// numbering is the processing loop's job.
pub trait VideoStream: Send {
    fn is_opened(&self) -> bool;

    fn metadata(&self) -> &StreamMetadata;

    fn read(&mut self) -> Result<Option<Frame>, ReadError>;

    /// Releases decoder and network resources. Must tolerate repeated calls.
    fn close(&mut self);
}
