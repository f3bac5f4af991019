use log::debug;
use std::fmt;

use super::{Phase, PhaseTracker};
use crate::core::pose::{Observation, PoseLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StsAction {
    Hold,
    Enter(Phase),
    /// 回到坐姿，完成一次
    CountRep,
}

impl Phase {
    /// 坐立计数的状态转移表
    pub fn sts_transition(self, label: PoseLabel) -> (Phase, StsAction) {
        match (self, label) {
            (Phase::Sit, PoseLabel::Sit) => (Phase::Sit, StsAction::Hold),
            (Phase::Sit, PoseLabel::Stand) => {
                (Phase::Transitioning, StsAction::Enter(Phase::Transitioning))
            }
            (Phase::Stand, PoseLabel::Stand) => (Phase::Stand, StsAction::Hold),
            (Phase::Stand, PoseLabel::Sit) => {
                (Phase::Transitioning, StsAction::Enter(Phase::Transitioning))
            }
            (Phase::Transitioning, PoseLabel::Sit) => (Phase::Sit, StsAction::CountRep),
            (Phase::Transitioning, PoseLabel::Stand) => {
                (Phase::Stand, StsAction::Enter(Phase::Stand))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StsMetrics {
    pub rep_count: u32,
    /// 第一次接受观测之前为 `None`
    pub phase: Option<Phase>,
}

impl fmt::Display for StsMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Some(phase) => write!(f, "Reps: {} ({})", self.rep_count, phase),
            None => write!(f, "Reps: {} (--)", self.rep_count),
        }
    }
}

/// Sit-to-stand repetition counter.
///
/// Without a preset, the starting phase is taken from the first accepted
/// observation and that observation neither transitions nor counts.
#[derive(Debug, Clone, Default)]
pub struct RepCounter {
    phase: Option<Phase>,
    initial_phase: Option<Phase>,
    rep_count: u32,
    accepted: u64,
}

impl RepCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a known phase instead of detecting it.
    pub fn with_initial_phase(initial_phase: Phase) -> Self {
        Self::starting_at(Some(initial_phase))
    }

    pub fn starting_at(initial_phase: Option<Phase>) -> Self {
        Self {
            phase: initial_phase,
            initial_phase,
            rep_count: 0,
            accepted: 0,
        }
    }

    pub fn step(&mut self, label: PoseLabel) -> StsAction {
        self.accepted += 1;

        let Some(phase) = self.phase else {
            let detected = Phase::from(label);
            debug!("Initial phase detected: {}", detected);
            self.phase = Some(detected);
            return StsAction::Enter(detected);
        };

        let (next, action) = phase.sts_transition(label);
        if action == StsAction::CountRep {
            self.rep_count += 1;
            debug!("🔁 Rep completed, total {}", self.rep_count);
        }
        self.phase = Some(next);

        action
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn accepted_count(&self) -> u64 {
        self.accepted
    }

    pub fn reset(&mut self) {
        *self = Self::starting_at(self.initial_phase);
    }
}

impl PhaseTracker for RepCounter {
    type Metrics = StsMetrics;

    fn observe(&mut self, observation: &Observation) {
        self.step(observation.label);
    }

    fn current_metrics(&self) -> StsMetrics {
        StsMetrics {
            rep_count: self.rep_count,
            phase: self.phase,
        }
    }

    // 至少接受过一次观测，0 次才算真实的 0
    fn is_conclusive(&self) -> bool {
        self.accepted > 0
    }
}
