use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};

use crate::detection::domain::detection_result::{DetectedFace, DetectionResult};
use crate::detection::domain::face_embedder::FaceEmbedder;
use crate::shared::jpeg::{encode_jpeg, DEFAULT_JPEG_QUALITY};
use crate::sink::domain::result_sink::{PersistenceError, ResultSink};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Forwards each face to a storage service as one multipart POST.
///
/// Fields: `filename`, `frame_index`, `person_index`, `confidence`, `image`
/// (JPEG) and, when an embedder is attached, `embedding` (little-endian f32
/// bytes). The record schema belongs to the service.
pub struct StorageServiceSink {
    client: reqwest::blocking::Client,
    endpoint: String,
    embedder: Option<Box<dyn FaceEmbedder>>,
}

impl StorageServiceSink {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            embedder: None,
        })
    }

    pub fn with_embedder(mut self, embedder: Box<dyn FaceEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    fn upload(&self, frame_index: usize, face: &DetectedFace) -> Result<(), PersistenceError> {
        let service_error = |message: String| PersistenceError::Service {
            filename: face.filename.clone(),
            message,
        };

        let jpeg = encode_jpeg(&face.image, DEFAULT_JPEG_QUALITY).map_err(|e| PersistenceError::Encode {
            filename: face.filename.clone(),
            source: e,
        })?;
        let image = Part::bytes(jpeg)
            .file_name(face.filename.clone())
            .mime_str("image/jpeg")
            .map_err(|e| service_error(e.to_string()))?;

        let mut form = Form::new()
            .text("filename", face.filename.clone())
            .text("frame_index", frame_index.to_string())
            .text("person_index", face.person_index.to_string())
            .text("confidence", face.confidence.to_string())
            .part("image", image);

        if let Some(embedder) = &self.embedder {
            let embedding = embedder.embed(&face.image).map_err(|e| PersistenceError::Embedding {
                filename: face.filename.clone(),
                message: e.to_string(),
            })?;
            let part = Part::bytes(embedding_bytes(&embedding))
                .mime_str("application/octet-stream")
                .map_err(|e| service_error(e.to_string()))?;
            form = form.part("embedding", part);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| service_error(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(service_error(format!("service returned {status}")));
        }
        Ok(())
    }
}

impl ResultSink for StorageServiceSink {
    fn store(&mut self, result: &DetectionResult) -> Result<(), PersistenceError> {
        for face in &result.faces {
            self.upload(result.frame_index, face)?;
        }
        log::debug!("Uploaded {} face(s) from frame {}", result.len(), result.frame_index);
        Ok(())
    }
}

/// Packs an embedding as consecutive little-endian f32 values.
pub fn embedding_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}
