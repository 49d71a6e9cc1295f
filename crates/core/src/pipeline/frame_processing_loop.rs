use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::detection::detection_adapter::DetectionAdapter;
use crate::detection::domain::face_detector::DetectorError;
use crate::display::box_overlay::annotate;
use crate::display::domain::frame_display::FrameDisplay;
use crate::sampling::frame_sampler::FrameSampler;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::DEFAULT_MAX_DETECTOR_FAILURES;
use crate::shared::frame::Frame;
use crate::sink::domain::result_sink::ResultSink;
use crate::stream::stream_handle::StreamHandle;
use crate::transform::frame_transform_pipeline::FrameTransformPipeline;

use super::loop_state::{ExitReason, LoopState, LoopStatus};
use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

const PACING_SLICE: Duration = Duration::from_millis(50);

/// What to do with a frame the transform pipeline rejects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Skip,
    Abort,
}

/// Delay between iterations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Pacing {
    #[default]
    Off,
    Fixed(Duration),
    /// Derived from the stream's declared rate and the sampling stride.
    StreamRate,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopOptions {
    pub pacing: Pacing,
    /// `None` tolerates transient detector failures forever.
    pub max_consecutive_detector_failures: Option<usize>,
    pub transform_failure: FailurePolicy,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            pacing: Pacing::Off,
            max_consecutive_detector_failures: Some(DEFAULT_MAX_DETECTOR_FAILURES),
            transform_failure: FailurePolicy::Skip,
        }
    }
}

/// Counters for one finished loop.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopReport {
    pub frames_read: usize,
    pub frames_sampled: usize,
    pub frames_skipped: usize,
    pub faces_detected: usize,
    pub results_persisted: usize,
    pub detector_failures: usize,
    pub persistence_failures: usize,
    pub display_failures: usize,
    pub exit: ExitReason,
    pub final_state: LoopState,
}

impl LoopReport {
    fn new() -> Self {
        Self {
            frames_read: 0,
            frames_sampled: 0,
            frames_skipped: 0,
            faces_detected: 0,
            results_persisted: 0,
            detector_failures: 0,
            persistence_failures: 0,
            display_failures: 0,
            exit: ExitReason::EndOfStream,
            final_state: LoopState::Running,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.final_state == LoopState::Stopped
    }
}

/// Sequential read → transform → sample → detect → persist loop over one stream.
///
/// One frame is in flight at a time and results reach the sink in frame
/// order. The loop consumes itself and the stream handle, so draining
/// (release handle, close display, close sink) happens exactly once no
/// matter how the loop ends.
pub struct FrameProcessingLoop {
    pipeline: FrameTransformPipeline,
    sampler: FrameSampler,
    adapter: DetectionAdapter,
    sink: Option<Box<dyn ResultSink>>,
    display: Option<Box<dyn FrameDisplay>>,
    logger: Box<dyn PipelineLogger>,
    options: LoopOptions,
    cancelled: Arc<AtomicBool>,
    status: LoopStatus,
}

impl FrameProcessingLoop {
    pub fn new(pipeline: FrameTransformPipeline, sampler: FrameSampler, adapter: DetectionAdapter) -> Self {
        Self {
            pipeline,
            sampler,
            adapter,
            sink: None,
            display: None,
            logger: Box::new(NullPipelineLogger),
            options: LoopOptions::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
            status: LoopStatus::new(),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_display(mut self, display: Box<dyn FrameDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_options(mut self, options: LoopOptions) -> Self {
        self.options = options;
        self
    }

    /// Shares an existing stop flag (e.g. one set by a signal handler).
    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn status(&self) -> LoopStatus {
        self.status.clone()
    }

    pub fn run(mut self, mut handle: StreamHandle) -> LoopReport {
        self.status.set(LoopState::Running);
        let pacing = self.resolve_pacing(handle.fps());
        self.logger.info(&format!(
            "Processing {} (every {} frame(s), stages: {:?})",
            handle.metadata().source,
            self.sampler.every_n(),
            self.pipeline.stage_names()
        ));

        let mut report = LoopReport::new();
        report.exit = self.process(&mut handle, pacing, &mut report);

        self.status.set(LoopState::Draining);
        self.drain(&mut handle, &mut report);

        report.final_state = report.exit.terminal_state();
        match report.final_state {
            LoopState::Failed => log::error!(
                "Capture loop failed after {} frame(s): {}",
                report.frames_read,
                report.exit
            ),
            _ => log::info!(
                "Capture loop stopped after {} frame(s): {}",
                report.frames_read,
                report.exit
            ),
        }
        self.logger.summary();
        self.status.set(report.final_state);
        report
    }

    fn resolve_pacing(&self, fps: f64) -> Option<Duration> {
        match self.options.pacing {
            Pacing::Off => None,
            Pacing::Fixed(delay) => Some(delay),
            Pacing::StreamRate => {
                let delay = self.sampler.pacing_for(fps);
                if delay.is_none() {
                    log::warn!("Stream rate {fps:.2} fps is unusable for pacing; running unpaced");
                }
                delay
            }
        }
    }

    fn process(&mut self, handle: &mut StreamHandle, pacing: Option<Duration>, report: &mut LoopReport) -> ExitReason {
        let mut consecutive_failures = 0usize;

        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                return ExitReason::StopRequested;
            }

            let t0 = Instant::now();
            let raw = match handle.read() {
                Ok(Some(frame)) => frame,
                Ok(None) => return ExitReason::EndOfStream,
                Err(e) => {
                    log::warn!("Read failed after {} frame(s): {e}", report.frames_read);
                    return ExitReason::ReadFailure(e);
                }
            };
            self.logger.timing("read", elapsed_ms(t0));

            report.frames_read += 1;
            let frame_index = report.frames_read;

            let t0 = Instant::now();
            let frame = match self.pipeline.apply(raw.with_index(frame_index)) {
                Ok(frame) => frame,
                Err(e) => {
                    report.frames_skipped += 1;
                    match self.options.transform_failure {
                        FailurePolicy::Skip => {
                            log::warn!("Frame {frame_index}: skipped ({e})");
                            self.logger.progress(report.frames_read, report.frames_sampled);
                            self.pace(pacing);
                            continue;
                        }
                        FailurePolicy::Abort => {
                            log::error!("Frame {frame_index}: {e}");
                            return ExitReason::TransformFailure(e);
                        }
                    }
                }
            };
            self.logger.timing("transform", elapsed_ms(t0));

            let mut boxes = Vec::new();
            if self.sampler.is_eligible(frame_index) {
                report.frames_sampled += 1;
                match self.detect_and_store(&frame, report) {
                    Ok(found) => {
                        consecutive_failures = 0;
                        boxes = found;
                    }
                    Err(e) if e.is_transient() => {
                        consecutive_failures += 1;
                        log::warn!("Frame {frame_index}: detector unavailable ({e}), skipping");
                        if let Some(max) = self.options.max_consecutive_detector_failures {
                            if consecutive_failures > max {
                                log::error!("Giving up after {consecutive_failures} consecutive detector failures");
                                return ExitReason::DetectorFailures {
                                    consecutive: consecutive_failures,
                                };
                            }
                        }
                    }
                    Err(e) => {
                        log::error!("Frame {frame_index}: {e}");
                        return ExitReason::DetectorFatal(e);
                    }
                }
            }

            self.show(&frame, &boxes, report);
            self.logger.progress(report.frames_read, report.frames_sampled);
            self.pace(pacing);
        }
    }

    /// Returns the boxes found so the display can overlay them.
    fn detect_and_store(&mut self, frame: &Frame, report: &mut LoopReport) -> Result<Vec<BoundingBox>, DetectorError> {
        let t0 = Instant::now();
        let result = match self.adapter.detect(frame) {
            Ok(result) => result,
            Err(e) => {
                report.detector_failures += 1;
                return Err(e);
            }
        };
        self.logger.timing("detect", elapsed_ms(t0));
        self.logger.metric("faces", result.len() as f64);
        report.faces_detected += result.len();

        if result.is_empty() {
            return Ok(Vec::new());
        }
        log::debug!("Frame {}: {} face(s)", result.frame_index, result.len());

        if let Some(sink) = self.sink.as_mut() {
            let t0 = Instant::now();
            match sink.store(&result) {
                Ok(()) => report.results_persisted += 1,
                Err(e) => {
                    report.persistence_failures += 1;
                    log::warn!("Frame {}: failed to persist result: {e}", result.frame_index);
                }
            }
            self.logger.timing("persist", elapsed_ms(t0));
        }
        Ok(result.boxes())
    }

    fn show(&mut self, frame: &Frame, boxes: &[BoundingBox], report: &mut LoopReport) {
        let Some(display) = self.display.as_mut() else {
            return;
        };
        let shown = if boxes.is_empty() {
            display.show(frame)
        } else {
            match annotate(frame, boxes) {
                Some(annotated) => display.show(&annotated),
                None => display.show(frame),
            }
        };
        if let Err(e) = shown {
            report.display_failures += 1;
            log::warn!("Frame {}: display failed: {e}", frame.index());
        }
    }

    /// Sleeps in short slices so a stop request is noticed promptly.
    fn pace(&self, pacing: Option<Duration>) {
        let Some(delay) = pacing else {
            return;
        };
        let deadline = Instant::now() + delay;
        while !self.cancelled.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep((deadline - now).min(PACING_SLICE));
        }
    }

    fn drain(&mut self, handle: &mut StreamHandle, report: &mut LoopReport) {
        handle.release();
        if let Some(display) = self.display.as_mut() {
            display.close();
        }
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.close() {
                report.persistence_failures += 1;
                log::warn!("Failed to close result sink: {e}");
            }
        }
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
