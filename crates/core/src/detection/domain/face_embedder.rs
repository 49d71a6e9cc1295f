use crate::shared::frame::Frame;

/// Maps a cropped face to a fixed-length feature vector.
pub trait FaceEmbedder: Send {
    fn embed(&self, face: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error>>;

    /// Length of the vectors returned by [`embed`](FaceEmbedder::embed).
    fn dimension(&self) -> usize;
}
