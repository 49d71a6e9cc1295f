use std::time::Duration;

use serde::Deserialize;

use crate::detection::domain::face_detector::{DetectorError, FaceDetector, ScoredBox};
use crate::shared::frame::Frame;
use crate::shared::jpeg::{encode_jpeg, DEFAULT_JPEG_QUALITY};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct DetectResponse {
    #[serde(default)]
    detections: Vec<RemoteDetection>,
}

#[derive(Debug, Deserialize)]
struct RemoteDetection {
    #[serde(rename = "box")]
    bbox: [f64; 4],
    #[serde(default = "full_confidence")]
    confidence: f64,
}

fn full_confidence() -> f64 {
    1.0
}

/// Detector backed by a remote inference service.
///
/// POSTs each frame as `image/jpeg` and expects
/// `{"detections": [{"box": [x1, y1, x2, y2], "confidence": c}]}` in the
/// coordinates of the posted image. Timeouts, connection failures, 429 and
/// 5xx responses are reported as transient.
pub struct HttpFaceDetector {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpFaceDetector {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl FaceDetector for HttpFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<ScoredBox>, DetectorError> {
        let body = encode_jpeg(frame, DEFAULT_JPEG_QUALITY).map_err(|e| DetectorError::Failed(e.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(body)
            .send()
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let parsed: DetectResponse = response
            .json()
            .map_err(|e| DetectorError::Failed(format!("malformed detector response: {e}")))?;
        Ok(parsed
            .detections
            .into_iter()
            .map(|d| ScoredBox {
                coords: d.bbox,
                confidence: d.confidence,
            })
            .collect())
    }
}

fn classify_transport_error(e: reqwest::Error) -> DetectorError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        DetectorError::Unavailable(e.to_string())
    } else {
        DetectorError::Failed(e.to_string())
    }
}

fn classify_status(status: reqwest::StatusCode) -> DetectorError {
    let message = format!("detector service returned {status}");
    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        DetectorError::Unavailable(message)
    } else {
        DetectorError::Failed(message)
    }
}
