//! 动作分析入口

use log::{error, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::models::{ExerciseKind, ExerciseReport};
use crate::core::config::{ConfigError, SessionConfig};
use crate::core::error::SessionError;
use crate::core::exercise::{
    PhaseTracker, PoseSession, RangeOfMotion, RepCounter, RomSession, TransitionTimer,
};
use crate::core::pose::{LandmarkDetector, ObservationFilter, PoseClassifier};
use crate::core::video::{FrameSource, ImageSequenceSource, SessionStream};

/// 动作分析器 - 每次调用都开启一个全新的会话
///
/// 分类器只读共享，会话状态从不共享，因此多个会话可以并行。
///
/// ```ignore
/// let analyzer = ExerciseAnalyzer::create(SessionConfig::default(), classifier)?;
/// let report = analyzer.analyze_sequence(ExerciseKind::SitToStand, "frames/")?;
/// println!("{}", report.to_json()?);
/// ```
pub struct ExerciseAnalyzer {
    config: SessionConfig,
    classifier: Arc<dyn PoseClassifier>,
    landmark_detector: Option<Arc<dyn LandmarkDetector>>,
}

impl ExerciseAnalyzer {
    pub fn create(
        config: SessionConfig,
        classifier: Arc<dyn PoseClassifier>,
    ) -> Result<Self, ConfigError> {
        crate::init_logging();
        config.validate()?;

        info!(
            "🏋️ ExerciseAnalyzer: created (threshold {:.2}, {:?} clock)",
            config.confidence_threshold, config.time_base
        );
        Ok(Self {
            config,
            classifier,
            landmark_detector: None,
        })
    }

    pub fn with_landmark_detector(mut self, detector: Arc<dyn LandmarkDetector>) -> Self {
        self.landmark_detector = Some(detector);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn sts_session<S: FrameSource>(
        &self,
        source: S,
    ) -> SessionStream<S, PoseSession<RepCounter>> {
        let tracker = RepCounter::starting_at(self.config.initial_phase);
        SessionStream::new(source, self.pose_session(tracker), self.config.time_base)
    }

    pub fn tug_session<S: FrameSource>(
        &self,
        source: S,
    ) -> SessionStream<S, PoseSession<TransitionTimer>> {
        let tracker = TransitionTimer::new();
        SessionStream::new(source, self.pose_session(tracker), self.config.time_base)
    }

    pub fn rom_session<S: FrameSource>(
        &self,
        source: S,
    ) -> Result<SessionStream<S, RomSession>, SessionError> {
        let detector = self
            .landmark_detector
            .clone()
            .ok_or(SessionError::LandmarkDetectorMissing)?;
        let tracker = RangeOfMotion::new(self.config.visibility_threshold);
        Ok(SessionStream::new(
            source,
            RomSession::new(detector, tracker),
            self.config.time_base,
        ))
    }

    /// 跑完整个来源并生成报告
    pub fn analyze<S: FrameSource>(
        &self,
        kind: ExerciseKind,
        source: S,
    ) -> Result<ExerciseReport, SessionError> {
        let report = match kind {
            ExerciseKind::SitToStand => {
                ExerciseReport::from_sts(&self.sts_session(source).run_to_end()?)
            }
            ExerciseKind::TimedUpAndGo => {
                ExerciseReport::from_tug(&self.tug_session(source).run_to_end()?)
            }
            ExerciseKind::RangeOfMotion => {
                ExerciseReport::from_rom(&self.rom_session(source)?.run_to_end()?)
            }
        };

        if report.conclusive {
            info!("✅ {:?} finished after {} frames", kind, report.frames);
        } else {
            info!("🤷 {:?} inconclusive after {} frames", kind, report.frames);
        }
        Ok(report)
    }

    pub fn analyze_sequence(
        &self,
        kind: ExerciseKind,
        dir: impl AsRef<Path>,
    ) -> Result<ExerciseReport, SessionError> {
        let source = ImageSequenceSource::open(dir, self.config.capture_fps)?;
        self.analyze(kind, source)
    }

    /// 并行分析多个图片序列，结果顺序与输入一致
    pub fn analyze_sequences(
        &self,
        kind: ExerciseKind,
        dirs: &[PathBuf],
    ) -> Vec<Result<ExerciseReport, SessionError>> {
        dirs.par_iter()
            .map(|dir| {
                self.analyze_sequence(kind, dir).map_err(|e| {
                    error!("❌ Failed to analyze {:?}: {}", dir, e);
                    e
                })
            })
            .collect()
    }

    fn pose_session<T: PhaseTracker>(&self, tracker: T) -> PoseSession<T> {
        PoseSession::new(
            self.classifier.clone(),
            ObservationFilter::with_threshold(self.config.confidence_threshold),
            tracker,
        )
    }
}

impl Drop for ExerciseAnalyzer {
    fn drop(&mut self) {
        info!("🗑️ ExerciseAnalyzer: released");
    }
}
