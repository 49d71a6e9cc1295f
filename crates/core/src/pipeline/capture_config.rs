use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::detection::detection_adapter::DetectionAdapter;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_embedder::FaceEmbedder;
use crate::detection::infrastructure::http_face_detector::HttpFaceDetector;
use crate::detection::infrastructure::onnx_arcface_embedder::OnnxArcFaceEmbedder;
use crate::detection::infrastructure::onnx_yolo_detector::{OnnxYoloDetector, DEFAULT_CONFIDENCE};
use crate::display::domain::frame_display::FrameDisplay;
use crate::display::infrastructure::snapshot_file_display::SnapshotFileDisplay;
use crate::sampling::frame_sampler::FrameSampler;
use crate::shared::constants::{
    DEFAULT_CAMERA_RESOLUTION, DEFAULT_CANNY_HIGH, DEFAULT_CANNY_LOW, DEFAULT_CONNECT_ATTEMPTS,
    DEFAULT_CONNECT_DELAY_SECS, DEFAULT_EVERY_N, DEFAULT_MAX_DETECTOR_FAILURES, DEFAULT_ROI, DEFAULT_SCALE,
};
use crate::shared::model_resolver::{ModelResolver, FACE_DETECTION_MODEL, FACE_EMBEDDING_MODEL};
use crate::shared::validation_error::ValidationError;
use crate::sink::domain::result_sink::ResultSink;
use crate::sink::infrastructure::background_sink::BackgroundSink;
use crate::sink::infrastructure::composite_sink::CompositeSink;
use crate::sink::infrastructure::filesystem_sink::FilesystemSink;
use crate::sink::infrastructure::storage_service_sink::StorageServiceSink;
use crate::stream::infrastructure::ffmpeg_stream::FfmpegStreamOpener;
use crate::stream::stream_connector::{Backoff, RetryPolicy, StreamConnector};
use crate::transform::domain::transform_stage::TransformStage;
use crate::transform::frame_transform_pipeline::FrameTransformPipeline;
use crate::transform::infrastructure::canny_stage::CannyStage;
use crate::transform::infrastructure::crop_stage::CropStage;
use crate::transform::infrastructure::gray_to_rgb_stage::GrayToRgbStage;
use crate::transform::infrastructure::scale_stage::ScaleStage;

use super::capture_session::CaptureSession;
use super::frame_processing_loop::{FailurePolicy, FrameProcessingLoop, LoopOptions, Pacing};
use super::pipeline_error::PipelineError;
use super::pipeline_logger::PipelineLogger;

const DEFAULT_HTTP_TIMEOUT_SECS: f64 = 10.0;

/// Region of interest in rows `h1..h2` and columns `w1..w2`, applied first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub h1: u32,
    pub h2: u32,
    pub w1: u32,
    pub w2: u32,
}

impl Default for Roi {
    fn default() -> Self {
        let (h1, h2, w1, w2) = DEFAULT_ROI;
        Self { h1, h2, w1, w2 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        let (width, height) = DEFAULT_CAMERA_RESOLUTION;
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeThresholds {
    pub low: f32,
    pub high: f32,
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_CANNY_LOW,
            high: DEFAULT_CANNY_HIGH,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DetectorConfig {
    /// Local YOLO model; the default model is downloaded on first use.
    Onnx {
        #[serde(default)]
        model: Option<PathBuf>,
        #[serde(default = "default_confidence")]
        confidence: f64,
    },
    /// Remote inference service.
    Http {
        endpoint: String,
        #[serde(default = "default_http_timeout")]
        timeout_secs: f64,
    },
}

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

fn default_http_timeout() -> f64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig::Onnx {
            model: None,
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

/// Everything needed to run one capture loop, loadable from JSON.
///
/// Missing fields take the defaults of the deployed camera setup. Negative
/// numbers for unsigned fields are rejected by the parser; everything else is
/// checked by [`validate`](CaptureConfig::validate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    pub source: String,
    pub every_n: usize,
    /// `None` disables cropping.
    pub roi: Option<Roi>,
    /// Expected camera resolution, used to check the ROI before connecting.
    pub camera_resolution: Resolution,
    /// `None` disables scaling.
    pub scale: Option<f64>,
    /// `None` disables edge extraction.
    pub edges: Option<EdgeThresholds>,
    /// Restore three channels after edge extraction.
    pub restore_rgb: bool,
    pub connect_attempts: u32,
    pub connect_delay_secs: f64,
    /// Multiplier for exponential backoff; `None` keeps the delay fixed.
    pub backoff_factor: Option<f64>,
    pub max_connect_delay_secs: f64,
    pub detector: DetectorConfig,
    pub min_confidence: Option<f64>,
    pub max_consecutive_detector_failures: Option<usize>,
    pub transform_failure: FailurePolicy,
    /// Sleep between frames to match the stream's declared rate.
    pub pace_to_stream: bool,
    pub output_dir: Option<PathBuf>,
    pub storage_url: Option<String>,
    /// Attach ArcFace embeddings to storage-service uploads.
    pub embeddings: bool,
    pub embedding_model: Option<PathBuf>,
    /// Persist on a worker thread with a queue of this many results.
    pub background_queue: Option<usize>,
    /// Keep this image file updated with annotated frames.
    pub preview: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            every_n: DEFAULT_EVERY_N,
            roi: Some(Roi::default()),
            camera_resolution: Resolution::default(),
            scale: Some(DEFAULT_SCALE),
            edges: None,
            restore_rgb: true,
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            connect_delay_secs: DEFAULT_CONNECT_DELAY_SECS,
            backoff_factor: None,
            max_connect_delay_secs: 60.0,
            detector: DetectorConfig::default(),
            min_confidence: None,
            max_consecutive_detector_failures: Some(DEFAULT_MAX_DETECTOR_FAILURES),
            transform_failure: FailurePolicy::Skip,
            pace_to_stream: false,
            output_dir: Some(PathBuf::from("faces")),
            storage_url: None,
            embeddings: false,
            embedding_model: None,
            background_queue: None,
            preview: None,
        }
    }
}

impl CaptureConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PipelineError> {
        let config_error = |message: String| PipelineError::Config {
            path: path.to_path_buf(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        Self::from_json_str(&text).map_err(|e| config_error(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Checks every setting that can be checked without touching the network.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source.trim().is_empty() {
            return Err(ValidationError::EmptySource);
        }
        self.sampler()?;
        self.transform_pipeline()?;
        if let Some(roi) = self.roi {
            let Resolution { width, height } = self.camera_resolution;
            if roi.h2 > height || roi.w2 > width {
                return Err(ValidationError::RoiOutsideResolution {
                    h1: roi.h1,
                    h2: roi.h2,
                    w1: roi.w1,
                    w2: roi.w2,
                    width,
                    height,
                });
            }
        }
        self.retry_policy()?;
        if let Some(min) = self.min_confidence {
            if !(0.0..=1.0).contains(&min) {
                return Err(ValidationError::InvalidConfidence(min));
            }
        }
        match self.detector {
            DetectorConfig::Onnx { confidence, .. } => {
                if !(0.0..=1.0).contains(&confidence) {
                    return Err(ValidationError::InvalidConfidence(confidence));
                }
            }
            DetectorConfig::Http { timeout_secs, .. } => {
                timeout(timeout_secs)?;
            }
        }
        Ok(())
    }

    pub fn sampler(&self) -> Result<FrameSampler, ValidationError> {
        FrameSampler::new(self.every_n)
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy, ValidationError> {
        let delay = secs(self.connect_delay_secs)?;
        let backoff = match self.backoff_factor {
            None => Backoff::Fixed,
            Some(factor) => Backoff::Exponential {
                factor,
                max_delay: secs(self.max_connect_delay_secs)?,
            },
        };
        RetryPolicy::new(self.connect_attempts, delay, backoff)
    }

    /// Crop, then scale, then edge extraction, then back to RGB.
    pub fn transform_pipeline(&self) -> Result<FrameTransformPipeline, ValidationError> {
        let mut stages: Vec<Box<dyn TransformStage>> = Vec::new();
        if let Some(roi) = self.roi {
            stages.push(Box::new(CropStage::new(roi.h1, roi.h2, roi.w1, roi.w2)?));
        }
        if let Some(factor) = self.scale {
            stages.push(Box::new(ScaleStage::new(factor)?));
        }
        if let Some(edges) = self.edges {
            stages.push(Box::new(CannyStage::new(edges.low, edges.high)?));
            if self.restore_rgb {
                stages.push(Box::new(GrayToRgbStage::new()));
            }
        }
        Ok(FrameTransformPipeline::new(stages))
    }

    pub fn loop_options(&self) -> LoopOptions {
        LoopOptions {
            pacing: if self.pace_to_stream {
                Pacing::StreamRate
            } else {
                Pacing::Off
            },
            max_consecutive_detector_failures: self.max_consecutive_detector_failures,
            transform_failure: self.transform_failure,
        }
    }

    pub fn connector(&self) -> Result<StreamConnector, ValidationError> {
        Ok(StreamConnector::new(
            Box::new(FfmpegStreamOpener::new()),
            self.retry_policy()?,
        ))
    }

    pub fn build_detector(&self, resolver: &ModelResolver) -> Result<Box<dyn FaceDetector>, PipelineError> {
        match &self.detector {
            DetectorConfig::Onnx { model, confidence } => {
                let path = resolver.resolve(FACE_DETECTION_MODEL, model.as_deref(), None)?;
                let detector =
                    OnnxYoloDetector::new(&path, *confidence).map_err(|e| PipelineError::setup("face detector", e))?;
                Ok(Box::new(detector))
            }
            DetectorConfig::Http { endpoint, timeout_secs } => {
                let detector = HttpFaceDetector::with_timeout(endpoint.as_str(), timeout(*timeout_secs)?)
                    .map_err(|e| PipelineError::setup("face detector", e))?;
                Ok(Box::new(detector))
            }
        }
    }

    pub fn build_adapter(&self, resolver: &ModelResolver) -> Result<DetectionAdapter, PipelineError> {
        let adapter = DetectionAdapter::new(self.build_detector(resolver)?);
        Ok(match self.min_confidence {
            Some(min) => adapter.with_min_confidence(min)?,
            None => adapter,
        })
    }

    /// Combines the configured sinks; `None` when nothing is persisted.
    pub fn build_sink(&self, resolver: &ModelResolver) -> Result<Option<Box<dyn ResultSink>>, PipelineError> {
        let mut sinks: Vec<Box<dyn ResultSink>> = Vec::new();
        if let Some(dir) = &self.output_dir {
            sinks.push(Box::new(FilesystemSink::new(dir)));
        }
        if let Some(url) = &self.storage_url {
            let mut sink =
                StorageServiceSink::new(url.as_str()).map_err(|e| PipelineError::setup("storage service", e))?;
            if self.embeddings {
                sink = sink.with_embedder(self.build_embedder(resolver)?);
            }
            sinks.push(Box::new(sink));
        }

        let sink: Box<dyn ResultSink> = match sinks.len() {
            0 => return Ok(None),
            1 => sinks.remove(0),
            _ => Box::new(CompositeSink::new(sinks)),
        };
        Ok(Some(match self.background_queue {
            Some(capacity) => Box::new(BackgroundSink::with_capacity(sink, capacity)),
            None => sink,
        }))
    }

    fn build_embedder(&self, resolver: &ModelResolver) -> Result<Box<dyn FaceEmbedder>, PipelineError> {
        let path = resolver.resolve(FACE_EMBEDDING_MODEL, self.embedding_model.as_deref(), None)?;
        let embedder = OnnxArcFaceEmbedder::new(&path).map_err(|e| PipelineError::setup("face embedder", e))?;
        Ok(Box::new(embedder))
    }

    pub fn build_display(&self) -> Option<Box<dyn FrameDisplay>> {
        self.preview
            .as_ref()
            .map(|path| Box::new(SnapshotFileDisplay::new(path)) as Box<dyn FrameDisplay>)
    }

    /// Validates, then wires up a ready-to-start session.
    pub fn build_session(
        &self,
        resolver: &ModelResolver,
        logger: Box<dyn PipelineLogger>,
        cancelled: Arc<AtomicBool>,
    ) -> Result<CaptureSession, PipelineError> {
        self.validate()?;
        let mut processing = FrameProcessingLoop::new(
            self.transform_pipeline()?,
            self.sampler()?,
            self.build_adapter(resolver)?,
        )
        .with_logger(logger)
        .with_options(self.loop_options())
        .with_cancel_flag(cancelled);
        if let Some(sink) = self.build_sink(resolver)? {
            processing = processing.with_sink(sink);
        }
        if let Some(display) = self.build_display() {
            processing = processing.with_display(display);
        }
        Ok(CaptureSession::new(self.source.clone(), self.connector()?, processing))
    }
}

fn secs(value: f64) -> Result<Duration, ValidationError> {
    Duration::try_from_secs_f64(value).map_err(|_| ValidationError::InvalidRetryDelay(value))
}

fn timeout(value: f64) -> Result<Duration, ValidationError> {
    secs(value).map_err(|_| ValidationError::InvalidTimeout(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;
    use rstest::rstest;

    fn config() -> CaptureConfig {
        CaptureConfig {
            source: "rtsp://10.0.0.5/stream1".to_string(),
            ..CaptureConfig::default()
        }
    }

    #[test]
    fn test_defaults_match_deployed_camera() {
        let c = CaptureConfig::default();
        assert_eq!(c.every_n, 5);
        assert_eq!(c.scale, Some(0.5));
        assert_eq!(
            c.roi,
            Some(Roi {
                h1: 1000,
                h2: 1800,
                w1: 250,
                w2: 2350
            })
        );
        assert_eq!(c.camera_resolution, Resolution { width: 2592, height: 1920 });
        assert_eq!(c.connect_attempts, 5);
        assert_eq!(c.max_consecutive_detector_failures, Some(10));
    }

    #[test]
    fn test_default_config_with_source_is_valid() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn test_empty_source_is_rejected() {
        assert_eq!(CaptureConfig::default().validate(), Err(ValidationError::EmptySource));
    }

    #[test]
    fn test_zero_stride_is_rejected() {
        let c = CaptureConfig { every_n: 0, ..config() };
        assert_eq!(c.validate(), Err(ValidationError::NonPositiveStride(0)));
    }

    #[test]
    fn test_negative_stride_is_rejected_by_parser() {
        assert!(CaptureConfig::from_json_str(r#"{"every_n": -5}"#).is_err());
    }

    #[test]
    fn test_roi_outside_resolution_is_rejected() {
        let c = CaptureConfig {
            camera_resolution: Resolution {
                width: 1920,
                height: 1080,
            },
            ..config()
        };
        assert!(matches!(c.validate(), Err(ValidationError::RoiOutsideResolution { .. })));
    }

    #[rstest]
    #[case(Some(0.0))]
    #[case(Some(-1.0))]
    #[case(Some(f64::NAN))]
    fn test_bad_scale_is_rejected(#[case] scale: Option<f64>) {
        let c = CaptureConfig { scale, ..config() };
        assert!(matches!(c.validate(), Err(ValidationError::InvalidScale(_))));
    }

    #[test]
    fn test_unordered_edge_thresholds_are_rejected() {
        let c = CaptureConfig {
            edges: Some(EdgeThresholds { low: 200.0, high: 100.0 }),
            ..config()
        };
        assert!(matches!(c.validate(), Err(ValidationError::InvalidEdgeThresholds { .. })));
    }

    #[test]
    fn test_connection_settings_are_validated() {
        let c = CaptureConfig {
            connect_attempts: 0,
            ..config()
        };
        assert_eq!(c.validate(), Err(ValidationError::NoConnectAttempts));

        let c = CaptureConfig {
            connect_delay_secs: -1.0,
            ..config()
        };
        assert_eq!(c.validate(), Err(ValidationError::InvalidRetryDelay(-1.0)));

        let c = CaptureConfig {
            backoff_factor: Some(0.5),
            ..config()
        };
        assert_eq!(c.validate(), Err(ValidationError::InvalidBackoffFactor(0.5)));
    }

    #[test]
    fn test_min_confidence_is_validated() {
        let c = CaptureConfig {
            min_confidence: Some(1.5),
            ..config()
        };
        assert_eq!(c.validate(), Err(ValidationError::InvalidConfidence(1.5)));
    }

    #[test]
    fn test_pipeline_stage_order() {
        assert_eq!(config().transform_pipeline().unwrap().stage_names(), vec!["crop", "scale"]);

        let with_edges = CaptureConfig {
            edges: Some(EdgeThresholds::default()),
            ..config()
        };
        assert_eq!(
            with_edges.transform_pipeline().unwrap().stage_names(),
            vec!["crop", "scale", "canny", "gray_to_rgb"]
        );

        let bare = CaptureConfig {
            roi: None,
            scale: None,
            edges: None,
            ..config()
        };
        assert!(bare.transform_pipeline().unwrap().is_empty());
    }

    #[test]
    fn test_default_pipeline_on_reference_frame() {
        let pipeline = config().transform_pipeline().unwrap();
        let out = pipeline.apply(Frame::filled(2592, 1920, 3, 90)).unwrap();
        // ROI is 2100x800, halved; color survives since edges are off.
        assert_eq!((out.width(), out.height(), out.channels()), (1050, 400, 3));
        assert!(out.data().iter().all(|&v| v.abs_diff(90) <= 1));
    }

    #[test]
    fn test_retry_policy_backoff() {
        let c = CaptureConfig {
            connect_delay_secs: 1.0,
            backoff_factor: Some(2.0),
            max_connect_delay_secs: 3.0,
            ..config()
        };
        let policy = c.retry_policy().unwrap();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(3));
    }

    #[rstest]
    #[case(1e20)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_unrepresentable_connect_delay_is_rejected(#[case] delay: f64) {
        let c = CaptureConfig {
            connect_delay_secs: delay,
            ..config()
        };
        assert!(matches!(c.validate(), Err(ValidationError::InvalidRetryDelay(_))));
    }

    #[test]
    fn test_unrepresentable_max_delay_is_rejected() {
        let c = CaptureConfig {
            backoff_factor: Some(2.0),
            max_connect_delay_secs: 1e20,
            ..config()
        };
        assert_eq!(c.validate(), Err(ValidationError::InvalidRetryDelay(1e20)));
    }

    #[rstest]
    #[case(1e20)]
    #[case(-3.0)]
    fn test_unrepresentable_detector_timeout_is_rejected(#[case] timeout_secs: f64) {
        let c = CaptureConfig {
            detector: DetectorConfig::Http {
                endpoint: "http://127.0.0.1:9/detect".to_string(),
                timeout_secs,
            },
            ..config()
        };
        assert!(matches!(c.validate(), Err(ValidationError::InvalidTimeout(_))));
    }

    #[test]
    fn test_loop_options() {
        let c = CaptureConfig {
            pace_to_stream: true,
            transform_failure: FailurePolicy::Abort,
            max_consecutive_detector_failures: None,
            ..config()
        };
        let options = c.loop_options();
        assert_eq!(options.pacing, Pacing::StreamRate);
        assert_eq!(options.transform_failure, FailurePolicy::Abort);
        assert_eq!(options.max_consecutive_detector_failures, None);
    }

    #[test]
    fn test_parses_partial_json_with_defaults() {
        let c = CaptureConfig::from_json_str(
            r#"{
                "source": "rtsp://cam/1",
                "every_n": 10,
                "roi": null,
                "detector": {"kind": "http", "endpoint": "http://infer:8080/detect"},
                "transform_failure": "abort"
            }"#,
        )
        .unwrap();
        assert_eq!(c.source, "rtsp://cam/1");
        assert_eq!(c.every_n, 10);
        assert_eq!(c.roi, None);
        assert_eq!(c.scale, Some(0.5));
        assert_eq!(c.transform_failure, FailurePolicy::Abort);
        assert_eq!(
            c.detector,
            DetectorConfig::Http {
                endpoint: "http://infer:8080/detect".to_string(),
                timeout_secs: 10.0
            }
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(CaptureConfig::from_json_str(r#"{"evry_n": 5}"#).is_err());
    }

    #[test]
    fn test_json_file_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("capture.json");
        let original = CaptureConfig {
            storage_url: Some("http://store/faces".to_string()),
            background_queue: Some(4),
            ..config()
        };
        std::fs::write(&path, original.to_json().unwrap()).unwrap();
        assert_eq!(CaptureConfig::from_json_file(&path).unwrap(), original);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = CaptureConfig::from_json_file(Path::new("/nonexistent/capture.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }));
    }

    #[test]
    fn test_build_sink_variants() {
        let tmp = tempfile::tempdir().unwrap();
        let resolver = ModelResolver::new(tmp.path().to_path_buf());

        let none = CaptureConfig {
            output_dir: None,
            ..config()
        };
        assert!(none.build_sink(&resolver).unwrap().is_none());

        let both = CaptureConfig {
            output_dir: Some(tmp.path().join("faces")),
            storage_url: Some("http://127.0.0.1:9/faces".to_string()),
            background_queue: Some(2),
            ..config()
        };
        let mut sink = both.build_sink(&resolver).unwrap().unwrap();
        sink.close().unwrap();
    }

    #[test]
    fn test_build_http_detector_needs_no_model() {
        let tmp = tempfile::tempdir().unwrap();
        let resolver = ModelResolver::new(tmp.path().to_path_buf());
        let c = CaptureConfig {
            detector: DetectorConfig::Http {
                endpoint: "http://127.0.0.1:9/detect".to_string(),
                timeout_secs: 1.0,
            },
            ..config()
        };
        assert!(c.build_adapter(&resolver).is_ok());
    }

    #[test]
    fn test_missing_model_override_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let resolver = ModelResolver::new(tmp.path().to_path_buf());
        let c = CaptureConfig {
            detector: DetectorConfig::Onnx {
                model: Some(tmp.path().join("missing.onnx")),
                confidence: 0.3,
            },
            ..config()
        };
        assert!(matches!(c.build_detector(&resolver), Err(PipelineError::Model(_))));
    }

    #[test]
    fn test_preview_builds_display() {
        let c = CaptureConfig {
            preview: Some(PathBuf::from("preview.png")),
            ..config()
        };
        assert!(c.build_display().is_some());
        assert!(config().build_display().is_none());
    }
}
