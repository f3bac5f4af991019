//! 会话帧循环
//!
//! 拉取一帧 → 分析 → 产出，再拉取下一帧。调用方停止迭代、调用 `stop()`
//! 或者丢弃流都会结束会话，帧来源在结束时释放且只释放一次。

use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::frame::Frame;
use super::source::FrameSource;
use crate::core::config::TimeBase;
use crate::core::error::SessionError;
use crate::core::exercise::SessionSummary;

/// Per-frame work of one session. Implementations own all mutable state of
/// the session; nothing is shared between sessions.
pub trait FrameAnalyzer {
    type Metrics: Clone;

    fn analyze(&mut self, frame: &Frame, timestamp: Duration) -> Self::Metrics;

    fn current_metrics(&self) -> Self::Metrics;

    fn is_conclusive(&self) -> bool;

    fn calibrate(&mut self, _time_scale: f64) {}

    fn summary(&self, frames: u64) -> SessionSummary<Self::Metrics> {
        if self.is_conclusive() {
            SessionSummary::Measured {
                metrics: self.current_metrics(),
                frames,
            }
        } else {
            SessionSummary::Inconclusive { frames }
        }
    }
}

/// 外部停止信号，可跨线程克隆
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct FrameReport<M> {
    pub frame: Frame,
    pub metrics: M,
}

/// Measures how much slower (or faster) than capture time frames are being
/// processed. Used as the duration divisor with [`TimeBase::Processing`].
#[derive(Debug, Clone, Default)]
struct TimeCalibration {
    started: Option<Instant>,
    first_capture: Option<Duration>,
}

impl TimeCalibration {
    /// Returns the observation timestamp for this frame and, once enough
    /// capture time has elapsed, the current processing/capture ratio.
    fn stamp(&mut self, frame: &Frame, time_base: TimeBase) -> (Duration, Option<f64>) {
        match time_base {
            TimeBase::Capture => (frame.timestamp, None),
            TimeBase::Processing => {
                let started = *self.started.get_or_insert_with(Instant::now);
                let first_capture = *self.first_capture.get_or_insert(frame.timestamp);

                let processing = started.elapsed();
                let capture = frame.timestamp.saturating_sub(first_capture);
                let ratio = (!capture.is_zero() && !processing.is_zero())
                    .then(|| processing.as_secs_f64() / capture.as_secs_f64());
                (processing, ratio)
            }
        }
    }
}

pub struct SessionStream<S: FrameSource, A: FrameAnalyzer> {
    source: S,
    analyzer: A,
    time_base: TimeBase,
    calibration: TimeCalibration,
    stop: StopHandle,
    frames: u64,
    finished: bool,
}

impl<S: FrameSource, A: FrameAnalyzer> SessionStream<S, A> {
    pub fn new(source: S, analyzer: A, time_base: TimeBase) -> Self {
        debug!("Session started ({:?} clock)", time_base);
        Self {
            source,
            analyzer,
            time_base,
            calibration: TimeCalibration::default(),
            stop: StopHandle::default(),
            frames: 0,
            finished: false,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// 在拉取下一帧之前生效
    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_metrics(&self) -> A::Metrics {
        self.analyzer.current_metrics()
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Ends the session where it stands and returns the final result.
    pub fn finish(mut self) -> SessionSummary<A::Metrics> {
        self.close();
        self.analyzer.summary(self.frames)
    }

    /// Drains the source, then finishes. A source error aborts the session.
    pub fn run_to_end(mut self) -> Result<SessionSummary<A::Metrics>, SessionError> {
        while let Some(report) = self.next() {
            report?;
        }
        Ok(self.finish())
    }

    fn close(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.source.release();
        info!("🏁 Session closed after {} frames", self.frames);
    }
}

impl<S: FrameSource, A: FrameAnalyzer> Iterator for SessionStream<S, A> {
    type Item = Result<FrameReport<A::Metrics>, SessionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.stop.is_stopped() {
            debug!("Stop requested");
            self.close();
            return None;
        }

        let frame = match self.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                debug!("Frame source exhausted");
                self.close();
                return None;
            }
            Err(e) => {
                warn!("❌ Frame source failed: {}", e);
                self.close();
                return Some(Err(e));
            }
        };

        let (timestamp, ratio) = self.calibration.stamp(&frame, self.time_base);
        if let Some(ratio) = ratio {
            self.analyzer.calibrate(ratio);
        }

        let metrics = self.analyzer.analyze(&frame, timestamp);
        self.frames += 1;

        Some(Ok(FrameReport { frame, metrics }))
    }
}

impl<S: FrameSource, A: FrameAnalyzer> Drop for SessionStream<S, A> {
    fn drop(&mut self) {
        self.close();
    }
}
