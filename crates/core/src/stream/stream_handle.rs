use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;

use super::domain::video_stream::{ReadError, VideoStream};

/// Exclusive ownership of an open stream.
///
/// The underlying stream is closed exactly once, either by an explicit
/// [`release`](StreamHandle::release) or when the handle is dropped.
pub struct StreamHandle {
    stream: Box<dyn VideoStream>,
    metadata: StreamMetadata,
    released: bool,
}

impl StreamHandle {
    pub(crate) fn new(stream: Box<dyn VideoStream>) -> Self {
        let metadata = stream.metadata().clone();
        Self {
            stream,
            metadata,
            released: false,
        }
    }

    pub fn metadata(&self) -> &StreamMetadata {
        &self.metadata
    }

    /// Declared frame rate; 0.0 when unknown.
    pub fn fps(&self) -> f64 {
        self.metadata.fps
    }

    pub fn is_open(&self) -> bool {
        !self.released && self.stream.is_opened()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn read(&mut self) -> Result<Option<Frame>, ReadError> {
        if self.released {
            return Err(ReadError::Closed);
        }
        self.stream.read()
    }

    /// Closes the stream. Returns `true` only for the call that actually
    /// released it.
    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.stream.close();
        self.released = true;
        log::debug!("Released stream {}", self.metadata.source);
        true
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("metadata", &self.metadata)
            .field("released", &self.released)
            .finish()
    }
}
