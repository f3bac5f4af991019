use log::{debug, info, warn};
use std::fmt;
use std::time::Duration;

use super::{Phase, PhaseTracker};
use crate::core::pose::{Observation, PoseLabel};

#[derive(Debug, Clone, PartialEq)]
pub struct TugMetrics {
    /// 最近一次接受的姿态，会话开始前为 `None`
    pub phase: Option<Phase>,
    pub last_transition: Option<Duration>,
    pub history: Vec<Duration>,
}

impl fmt::Display for TugMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last_transition {
            Some(d) => write!(f, "Sit to stand transition time: {:.2} seconds", d.as_secs_f64()),
            None => f.write_str("Sit to stand transition time: --"),
        }
    }
}

/// Timed-up-and-go timer.
///
/// The anchor is the first accepted sit of the session and is never moved.
/// Every later entry into stand records the time elapsed since that anchor.
/// Durations are kept raw and divided by `time_scale` when reported.
#[derive(Debug, Clone)]
pub struct TransitionTimer {
    current_pose: Option<PoseLabel>,
    sit_start: Option<Duration>,
    stand_start: Option<Duration>,
    sit_to_stand_start: Option<Duration>,
    first_phase_seen: bool,
    history: Vec<Duration>,
    time_scale: f64,
}

impl TransitionTimer {
    pub fn new() -> Self {
        Self {
            current_pose: None,
            sit_start: None,
            stand_start: None,
            sit_to_stand_start: None,
            first_phase_seen: false,
            history: Vec::new(),
            time_scale: 1.0,
        }
    }

    /// Folds one accepted observation in. Returns the raw duration when this
    /// observation completed a sit→stand transition.
    pub fn step(&mut self, observation: &Observation) -> Option<Duration> {
        let now = observation.timestamp;
        let label = observation.label;

        if label == PoseLabel::Sit && !self.first_phase_seen {
            self.sit_to_stand_start = Some(now);
            self.first_phase_seen = true;
            info!("⏱️ TUG anchor set at {:.2}s", now.as_secs_f64());
        }

        if self.current_pose == Some(label) {
            return None;
        }

        match label {
            PoseLabel::Sit => self.sit_start = Some(now),
            PoseLabel::Stand => self.stand_start = Some(now),
        }
        self.current_pose = Some(label);

        if label != PoseLabel::Stand || !self.first_phase_seen {
            return None;
        }

        let start = self.sit_to_stand_start?;
        let elapsed = now.saturating_sub(start);
        self.history.push(elapsed);
        debug!(
            "Sit to stand transition #{}: raw {:.3}s",
            self.history.len(),
            elapsed.as_secs_f64()
        );
        Some(elapsed)
    }

    pub fn current_pose(&self) -> Option<PoseLabel> {
        self.current_pose
    }

    pub fn sit_start(&self) -> Option<Duration> {
        self.sit_start
    }

    pub fn stand_start(&self) -> Option<Duration> {
        self.stand_start
    }

    pub fn sit_to_stand_start(&self) -> Option<Duration> {
        self.sit_to_stand_start
    }

    pub fn raw_history(&self) -> &[Duration] {
        &self.history
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// 最近一次的过渡时间（已换算）
    pub fn last_transition(&self) -> Option<Duration> {
        self.history.last().map(|&d| self.normalize(d))
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        if !time_scale.is_finite() || time_scale <= 0.0 {
            warn!("Ignoring invalid TUG time scale {}", time_scale);
            return;
        }
        self.time_scale = time_scale;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn normalize(&self, raw: Duration) -> Duration {
        Duration::from_secs_f64(raw.as_secs_f64() / self.time_scale)
    }
}

impl Default for TransitionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker for TransitionTimer {
    type Metrics = TugMetrics;

    fn observe(&mut self, observation: &Observation) {
        self.step(observation);
    }

    fn current_metrics(&self) -> TugMetrics {
        TugMetrics {
            phase: self.current_pose.map(Phase::from),
            last_transition: self.last_transition(),
            history: self.history.iter().map(|&d| self.normalize(d)).collect(),
        }
    }

    fn is_conclusive(&self) -> bool {
        !self.history.is_empty()
    }

    fn calibrate(&mut self, time_scale: f64) {
        self.set_time_scale(time_scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pose::{ObservationFilter, PosePrediction};
    use approx::assert_relative_eq;

    use crate::core::pose::PoseLabel::{Sit, Stand};

    fn obs(label: PoseLabel, secs: u64) -> Observation {
        Observation::new(label, 0.9, Duration::from_secs(secs))
    }

    fn run(stream: &[(PoseLabel, u64)]) -> TransitionTimer {
        let mut timer = TransitionTimer::new();
        for &(label, secs) in stream {
            timer.step(&obs(label, secs));
        }
        timer
    }

    #[test]
    fn test_sit_then_stand_measures_five() {
        let mut timer = TransitionTimer::new();
        assert_eq!(timer.step(&obs(Sit, 0)), None);
        assert_eq!(timer.step(&obs(Stand, 5)), Some(Duration::from_secs(5)));

        let metrics = timer.current_metrics();
        assert_eq!(metrics.phase, Some(Phase::Stand));
        assert_eq!(metrics.last_transition, Some(Duration::from_secs(5)));
        assert_eq!(metrics.history, vec![Duration::from_secs(5)]);
    }

    #[test]
    fn test_stand_only_is_inconclusive() {
        let timer = run(&[(Stand, 0), (Stand, 1), (Stand, 2)]);
        assert!(!timer.is_conclusive());
        assert_eq!(timer.sit_to_stand_start(), None);
        assert_eq!(timer.last_transition(), None);
        assert_eq!(timer.current_metrics().to_string(), "Sit to stand transition time: --");
    }

    #[test]
    fn test_anchor_is_set_once() {
        let timer = run(&[(Sit, 0), (Stand, 5), (Sit, 8), (Stand, 10)]);
        assert_eq!(timer.sit_to_stand_start(), Some(Duration::ZERO));
        assert_eq!(
            timer.raw_history(),
            &[Duration::from_secs(5), Duration::from_secs(10)]
        );
        assert_eq!(timer.sit_start(), Some(Duration::from_secs(8)));
    }

    #[test]
    fn test_holding_stand_records_once() {
        let timer = run(&[(Sit, 0), (Stand, 2), (Stand, 3), (Stand, 4)]);
        assert_eq!(timer.raw_history(), &[Duration::from_secs(2)]);
        assert_eq!(timer.stand_start(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_phase_start_only_on_entry() {
        let timer = run(&[(Sit, 1), (Sit, 2), (Sit, 3)]);
        assert_eq!(timer.sit_start(), Some(Duration::from_secs(1)));
        assert_eq!(timer.current_pose(), Some(Sit));
        assert!(!timer.is_conclusive());
    }

    #[test]
    fn test_stand_before_first_sit() {
        let timer = run(&[(Stand, 0), (Sit, 1), (Stand, 4)]);
        assert_eq!(timer.raw_history(), &[Duration::from_secs(3)]);
    }

    #[test]
    fn test_low_confidence_stream_is_noop() {
        let filter = ObservationFilter::new();
        let mut timer = TransitionTimer::new();
        let before = timer.current_metrics();

        for (secs, label) in [Sit, Stand, Sit, Stand].into_iter().enumerate() {
            let predictions = [PosePrediction::new(label, 0.49)];
            if let Some(obs) = filter.select(&predictions, Duration::from_secs(secs as u64)) {
                timer.observe(&obs);
            }
        }

        assert_eq!(timer.current_metrics(), before);
        assert_eq!(timer.sit_to_stand_start(), None);
        assert_eq!(timer.current_pose(), None);
        assert!(!timer.is_conclusive());
    }

    #[test]
    fn test_time_scale_divides_reported_values() {
        let mut timer = run(&[(Sit, 0), (Stand, 5)]);
        timer.calibrate(2.0);

        assert_eq!(timer.raw_history(), &[Duration::from_secs(5)]);
        let reported = timer.last_transition().unwrap();
        assert_relative_eq!(reported.as_secs_f64(), 2.5, epsilon = 1e-9);
        assert_eq!(
            timer.current_metrics().to_string(),
            "Sit to stand transition time: 2.50 seconds"
        );
    }

    #[test]
    fn test_invalid_time_scale_ignored() {
        let mut timer = TransitionTimer::new();
        timer.calibrate(0.0);
        timer.calibrate(f64::NAN);
        assert_eq!(timer.time_scale(), 1.0);
    }

    #[test]
    fn test_independent_timers_agree() {
        let stream = [(Stand, 0), (Sit, 2), (Sit, 3), (Stand, 6), (Sit, 9), (Stand, 12)];
        let a = run(&stream);
        let b = run(&stream);
        assert_eq!(a.current_metrics(), b.current_metrics());
        assert_eq!(a.current_metrics(), a.current_metrics());
    }

    #[test]
    fn test_reset() {
        let mut timer = run(&[(Sit, 0), (Stand, 5)]);
        timer.calibrate(3.0);
        timer.reset();
        assert!(!timer.is_conclusive());
        assert_eq!(timer.current_pose(), None);
        assert_eq!(timer.time_scale(), 1.0);
    }
}
