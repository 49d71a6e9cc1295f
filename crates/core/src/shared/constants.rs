pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

/// Process every Nth frame.
pub const DEFAULT_EVERY_N: usize = 5;

pub const DEFAULT_SCALE: f64 = 0.5;

/// Region of interest on the reference camera as `(h1, h2, w1, w2)`.
pub const DEFAULT_ROI: (u32, u32, u32, u32) = (1000, 1800, 250, 2350);

/// Reference camera resolution as `(width, height)`.
pub const DEFAULT_CAMERA_RESOLUTION: (u32, u32) = (2592, 1920);

pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 5;
pub const DEFAULT_CONNECT_DELAY_SECS: f64 = 5.0;

pub const DEFAULT_CANNY_LOW: f32 = 100.0;
pub const DEFAULT_CANNY_HIGH: f32 = 200.0;

/// Consecutive detector failures tolerated before a loop gives up.
pub const DEFAULT_MAX_DETECTOR_FAILURES: usize = 10;

pub const FACE_FILENAME_EXTENSION: &str = "jpg";
