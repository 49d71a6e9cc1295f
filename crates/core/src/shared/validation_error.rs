use thiserror::Error;

/// Configuration rejected before a capture loop starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("sampling stride must be a positive integer, got {0}")]
    NonPositiveStride(usize),
    #[error("scale factor must be a finite number > 0, got {0}")]
    InvalidScale(f64),
    #[error("region of interest is empty: rows {h1}..{h2}, columns {w1}..{w2}")]
    EmptyRoi { h1: u32, h2: u32, w1: u32, w2: u32 },
    #[error(
        "region of interest rows {h1}..{h2}, columns {w1}..{w2} exceeds camera resolution {width}x{height}"
    )]
    RoiOutsideResolution {
        h1: u32,
        h2: u32,
        w1: u32,
        w2: u32,
        width: u32,
        height: u32,
    },
    #[error("edge thresholds must satisfy 0 <= low <= high, got low={low} high={high}")]
    InvalidEdgeThresholds { low: f32, high: f32 },
    #[error("max connection attempts must be at least 1")]
    NoConnectAttempts,
    #[error("retry delay must be a finite number of seconds >= 0, got {0}")]
    InvalidRetryDelay(f64),
    #[error("detector timeout must be a finite number of seconds >= 0, got {0}")]
    InvalidTimeout(f64),
    #[error("backoff factor must be >= 1.0, got {0}")]
    InvalidBackoffFactor(f64),
    #[error("confidence must be between 0.0 and 1.0, got {0}")]
    InvalidConfidence(f64),
    #[error("stream source must not be empty")]
    EmptySource,
}
