use std::fmt;
use std::sync::{Arc, Mutex};

use crate::detection::domain::face_detector::DetectorError;
use crate::stream::domain::video_stream::ReadError;
use crate::transform::domain::transform_stage::TransformError;

/// Lifecycle of one capture loop.
///
/// `Connecting → Running → Draining → Stopped`, or `Failed` from
/// `Connecting` (retries exhausted) or `Draining` (unrecoverable error).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Connecting,
    Running,
    Draining,
    Stopped,
    Failed,
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Stopped | LoopState::Failed)
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoopState::Connecting => "connecting",
            LoopState::Running => "running",
            LoopState::Draining => "draining",
            LoopState::Stopped => "stopped",
            LoopState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why the running loop left `Running`.
#[derive(Clone, Debug, PartialEq)]
pub enum ExitReason {
    EndOfStream,
    StopRequested,
    ReadFailure(ReadError),
    DetectorFailures { consecutive: usize },
    DetectorFatal(DetectorError),
    TransformFailure(TransformError),
}

impl ExitReason {
    /// End of stream, a stop request and a read fault are orderly exits;
    /// everything else fails the loop.
    pub fn terminal_state(&self) -> LoopState {
        match self {
            ExitReason::EndOfStream | ExitReason::StopRequested | ExitReason::ReadFailure(_) => LoopState::Stopped,
            ExitReason::DetectorFailures { .. } | ExitReason::DetectorFatal(_) | ExitReason::TransformFailure(_) => {
                LoopState::Failed
            }
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::EndOfStream => write!(f, "end of stream"),
            ExitReason::StopRequested => write!(f, "stop requested"),
            ExitReason::ReadFailure(e) => write!(f, "read failure: {e}"),
            ExitReason::DetectorFailures { consecutive } => {
                write!(f, "{consecutive} consecutive detector failures")
            }
            ExitReason::DetectorFatal(e) => write!(f, "fatal detector error: {e}"),
            ExitReason::TransformFailure(e) => write!(f, "transform failure: {e}"),
        }
    }
}

/// Shared view of a loop's current state, readable from other threads.
#[derive(Clone, Debug)]
pub struct LoopStatus {
    state: Arc<Mutex<LoopState>>,
}

impl LoopStatus {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LoopState::Connecting)),
        }
    }

    pub fn get(&self) -> LoopState {
        match self.state.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub(crate) fn set(&self, state: LoopState) {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *guard != state {
            log::debug!("Capture loop {} -> {}", *guard, state);
            *guard = state;
        }
    }
}

impl Default for LoopStatus {
    fn default() -> Self {
        Self::new()
    }
}
