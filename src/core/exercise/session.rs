use log::{debug, trace};
use std::sync::Arc;
use std::time::Duration;

use super::PhaseTracker;
use crate::core::pose::{ObservationFilter, PoseClassifier};
use crate::core::video::frame::Frame;
use crate::core::video::stream::FrameAnalyzer;

/// 分类 → 过滤 → 状态机，每帧一步
pub struct PoseSession<T: PhaseTracker> {
    classifier: Arc<dyn PoseClassifier>,
    filter: ObservationFilter,
    tracker: T,
}

impl<T: PhaseTracker> PoseSession<T> {
    pub fn new(classifier: Arc<dyn PoseClassifier>, filter: ObservationFilter, tracker: T) -> Self {
        Self {
            classifier,
            filter,
            tracker,
        }
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }
}

impl<T: PhaseTracker> FrameAnalyzer for PoseSession<T> {
    type Metrics = T::Metrics;

    fn analyze(&mut self, frame: &Frame, timestamp: Duration) -> T::Metrics {
        let predictions = self.classifier.classify(frame);

        match self.filter.select(&predictions, timestamp) {
            Some(observation) => {
                debug!(
                    "Frame {}: {} ({:.2})",
                    frame.frame_number, observation.label, observation.confidence
                );
                self.tracker.observe(&observation);
            }
            None => trace!(
                "Frame {}: no pose above {:.2} among {} predictions",
                frame.frame_number,
                self.filter.threshold(),
                predictions.len()
            ),
        }

        self.tracker.current_metrics()
    }

    fn current_metrics(&self) -> T::Metrics {
        self.tracker.current_metrics()
    }

    fn is_conclusive(&self) -> bool {
        self.tracker.is_conclusive()
    }

    fn calibrate(&mut self, time_scale: f64) {
        self.tracker.calibrate(time_scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exercise::{Phase, RepCounter, TransitionTimer};
    use crate::core::pose::{MockPoseClassifier, PoseLabel, PosePrediction};

    fn frame(n: u64) -> Frame {
        Frame::new(1, 1, vec![0, 0, 0, 255], n * 1000, n)
    }

    #[test]
    fn test_unknown_frames_hold_state() {
        let classifier = MockPoseClassifier::from_labels(
            vec![Some(PoseLabel::Sit), Some(PoseLabel::Stand), None, None, Some(PoseLabel::Sit)],
            0.9,
        );
        let mut session =
            PoseSession::new(Arc::new(classifier), ObservationFilter::new(), RepCounter::new());

        session.analyze(&frame(0), Duration::ZERO);
        let m1 = session.analyze(&frame(1), Duration::from_secs(1));
        assert_eq!(m1.phase, Some(Phase::Transitioning));
        for n in 2..4 {
            let m = session.analyze(&frame(n), Duration::from_secs(n));
            assert_eq!(m, m1);
        }
        let m4 = session.analyze(&frame(4), Duration::from_secs(4));
        assert_eq!(m4.rep_count, 1);
        assert_eq!(session.tracker().accepted_count(), 3);
    }

    #[test]
    fn test_best_person_governs() {
        let classifier = MockPoseClassifier::with_pattern(|n| {
            if n == 0 {
                vec![
                    PosePrediction::new(PoseLabel::Stand, 0.55),
                    PosePrediction::new(PoseLabel::Sit, 0.95),
                ]
            } else {
                vec![PosePrediction::new(PoseLabel::Stand, 0.8)]
            }
        });
        let mut session = PoseSession::new(
            Arc::new(classifier),
            ObservationFilter::new(),
            TransitionTimer::new(),
        );

        session.analyze(&frame(0), Duration::ZERO);
        let metrics = session.analyze(&frame(1), Duration::from_secs(4));
        assert_eq!(metrics.last_transition, Some(Duration::from_secs(4)));
        assert!(session.is_conclusive());
    }

    #[test]
    fn test_calibrate_reaches_tracker() {
        let mut session = PoseSession::new(
            Arc::new(MockPoseClassifier::new()),
            ObservationFilter::new(),
            TransitionTimer::new(),
        );
        session.calibrate(2.8);
        assert_eq!(session.tracker().time_scale(), 2.8);
    }
}
