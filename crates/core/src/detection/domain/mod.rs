pub mod detection_result;
pub mod face_detector;
pub mod face_embedder;
