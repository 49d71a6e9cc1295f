//! ArcFace face embedder using ONNX Runtime.
//!
//! Produces L2-normalized embeddings, so the dot product of two vectors is
//! their cosine similarity.
use std::path::Path;
use std::sync::Mutex;

use crate::detection::domain::face_embedder::FaceEmbedder;
use crate::shared::frame::Frame;

use super::onnx_session;

const INPUT_SIZE: usize = 112;
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;
const EMBEDDING_DIM: usize = 512;

pub struct OnnxArcFaceEmbedder {
    session: Mutex<ort::session::Session>,
}

impl OnnxArcFaceEmbedder {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = onnx_session::load_session(model_path)?;
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl FaceEmbedder for OnnxArcFaceEmbedder {
    fn embed(&self, face: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        if face.is_empty() {
            return Err("cannot embed an empty crop".into());
        }
        let tensor = preprocess(face);
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![input_value])?;
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let embedding_slice = embedding_array
            .as_slice()
            .ok_or("Cannot get embedding slice")?;

        let mut embedding = embedding_slice.to_vec();
        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Resize crop to 112x112 (nearest sample at pixel centers), normalize to
/// `[-1, 1]`, NCHW layout. Gray crops feed the same value to all planes.
fn preprocess(face: &Frame) -> ndarray::Array4<f32> {
    let src_w = face.width() as usize;
    let src_h = face.height() as usize;
    let src = face.as_ndarray();
    let last_channel = face.channels() as usize - 1;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, INPUT_SIZE, INPUT_SIZE));

    for y in 0..INPUT_SIZE {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / INPUT_SIZE as f64) as usize).min(src_h - 1);
        for x in 0..INPUT_SIZE {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / INPUT_SIZE as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = (src[[src_y, src_x, c.min(last_channel)]] as f32 - NORM_MEAN) / NORM_STD;
            }
        }
    }

    tensor
}

pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_l2_normalize_unit_vector() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert_relative_eq!(v[0], 0.6, epsilon = 1e-6);
        assert_relative_eq!(v[1], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let mut v = vec![0.0, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_preprocess_shape() {
        let tensor = preprocess(&Frame::filled(50, 30, 3, 128));
        assert_eq!(tensor.shape(), &[1, 3, 112, 112]);
    }

    #[test]
    fn test_preprocess_normalization_range() {
        let low = preprocess(&Frame::filled(10, 10, 3, 0));
        let high = preprocess(&Frame::filled(10, 10, 3, 255));
        assert_relative_eq!(low[[0, 0, 0, 0]], -1.0, epsilon = 0.01);
        assert_relative_eq!(high[[0, 2, 111, 111]], 1.0, epsilon = 0.01);
    }

    #[test]
    fn test_preprocess_gray_crop_fills_all_planes() {
        let tensor = preprocess(&Frame::filled(20, 20, 1, 255));
        for c in 0..3 {
            assert_relative_eq!(tensor[[0, c, 56, 56]], 1.0, epsilon = 0.01);
        }
    }
}
