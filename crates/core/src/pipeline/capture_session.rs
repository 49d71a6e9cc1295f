use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::stream::stream_connector::StreamConnector;

use super::frame_processing_loop::{FrameProcessingLoop, LoopReport};
use super::loop_state::{LoopState, LoopStatus};
use super::pipeline_error::PipelineError;

/// Connects to a stream, then runs a [`FrameProcessingLoop`] on its own thread.
///
/// Connection happens on the caller's thread so an unreachable source is
/// reported directly instead of surfacing later from a background thread.
pub struct CaptureSession {
    source: String,
    connector: StreamConnector,
    processing: FrameProcessingLoop,
}

impl CaptureSession {
    pub fn new(source: impl Into<String>, connector: StreamConnector, processing: FrameProcessingLoop) -> Self {
        Self {
            source: source.into(),
            connector,
            processing,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn start(mut self) -> Result<RunningCapture, PipelineError> {
        let status = self.processing.status();
        let cancelled = self.processing.stop_signal();
        status.set(LoopState::Connecting);

        let handle = match self.connector.connect(&self.source) {
            Ok(handle) => handle,
            Err(e) => {
                status.set(LoopState::Failed);
                return Err(e.into());
            }
        };

        let processing = self.processing;
        let worker = std::thread::Builder::new()
            .name("facestream-capture".to_string())
            .spawn(move || processing.run(handle))
            .map_err(|e| PipelineError::setup("capture thread", e))?;

        Ok(RunningCapture {
            source: self.source,
            cancelled,
            status,
            worker: Some(worker),
        })
    }
}

/// A capture loop running in the background.
///
/// Dropping it without calling [`join`](RunningCapture::join) stops the loop
/// and waits for it, so the stream is always released.
pub struct RunningCapture {
    source: String,
    cancelled: Arc<AtomicBool>,
    status: LoopStatus,
    worker: Option<JoinHandle<LoopReport>>,
}

impl RunningCapture {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Asks the loop to stop after the frame in flight.
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn state(&self) -> LoopState {
        self.status.get()
    }

    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, |w| w.is_finished())
    }

    /// Waits for the loop to reach a terminal state.
    pub fn join(mut self) -> Result<LoopReport, PipelineError> {
        let worker = self.worker.take().ok_or(PipelineError::WorkerPanicked)?;
        worker.join().map_err(|_| {
            self.status.set(LoopState::Failed);
            PipelineError::WorkerPanicked
        })
    }
}

impl Drop for RunningCapture {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.stop();
            if worker.join().is_err() {
                log::error!("Capture thread for {} panicked", self.source);
            }
        }
    }
}
