use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::detection::domain::detection_result::DetectionResult;
use crate::sink::domain::result_sink::{PersistenceError, ResultSink};

const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Moves persistence off the capture thread.
///
/// Results are handed to a single worker over a bounded channel, so they are
/// stored in the order they were queued. When the queue is full the result is
/// dropped and `store` returns [`PersistenceError::QueueFull`]; the capture
/// loop never blocks on a slow sink.
pub struct BackgroundSink {
    sender: Option<crossbeam_channel::Sender<DetectionResult>>,
    worker: Option<JoinHandle<Result<(), PersistenceError>>>,
    failures: Arc<AtomicUsize>,
}

impl BackgroundSink {
    pub fn new(inner: Box<dyn ResultSink>) -> Self {
        Self::with_capacity(inner, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(mut inner: Box<dyn ResultSink>, capacity: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded::<DetectionResult>(capacity.max(1));
        let failures = Arc::new(AtomicUsize::new(0));
        let worker_failures = failures.clone();

        let worker = std::thread::spawn(move || {
            for result in receiver {
                if let Err(e) = inner.store(&result) {
                    worker_failures.fetch_add(1, Ordering::Relaxed);
                    log::warn!("Failed to store frame {}: {e}", result.frame_index);
                }
            }
            inner.close()
        });

        Self {
            sender: Some(sender),
            worker: Some(worker),
            failures,
        }
    }

    /// Results the worker failed to store so far.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}

impl ResultSink for BackgroundSink {
    fn store(&mut self, result: &DetectionResult) -> Result<(), PersistenceError> {
        let Some(sender) = &self.sender else {
            return Err(PersistenceError::Disconnected);
        };
        sender.try_send(result.clone()).map_err(|e| match e {
            crossbeam_channel::TrySendError::Full(dropped) => PersistenceError::QueueFull(dropped.frame_index),
            crossbeam_channel::TrySendError::Disconnected(_) => PersistenceError::Disconnected,
        })
    }

    /// Waits for queued results to be stored, then closes the inner sink.
    fn close(&mut self) -> Result<(), PersistenceError> {
        drop(self.sender.take());
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        worker.join().map_err(|_| PersistenceError::Disconnected)?
    }
}

impl Drop for BackgroundSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Closing background sink: {e}");
        }
    }
}
