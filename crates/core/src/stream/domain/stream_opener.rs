use super::video_stream::VideoStream;

pub type OpenError = Box<dyn std::error::Error + Send + Sync>;

/// Opens a stream source (URI, file path or device) into a [`VideoStream`].
///
/// A returned stream may still report `is_opened() == false`; the connector
/// treats that the same as an error and retries.
pub trait StreamOpener: Send {
    fn open(&mut self, source: &str) -> Result<Box<dyn VideoStream>, OpenError>;
}
