//! 动作状态机
//!
//! 每个会话独占一个跟踪器实例：
//! - `sts` - 坐立计数（Sit-To-Stand）
//! - `tug` - 起立行走测试中坐到站的用时（Timed Up and Go）
//! - `rom` - 膝关节活动度（Range Of Motion）

pub mod rom;
pub mod session;
pub mod sts;
pub mod tug;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::pose::{Observation, PoseLabel};

pub use rom::{AngleRange, KneeAngles, RangeOfMotion, RomMetrics, RomSession};
pub use session::PoseSession;
pub use sts::{RepCounter, StsAction, StsMetrics};
pub use tug::{TransitionTimer, TugMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Sit,
    Stand,
    Transitioning,
}

impl From<PoseLabel> for Phase {
    fn from(label: PoseLabel) -> Self {
        match label {
            PoseLabel::Sit => Phase::Sit,
            PoseLabel::Stand => Phase::Stand,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Sit => "sit",
            Phase::Stand => "stand",
            Phase::Transitioning => "transitioning",
        })
    }
}

/// Exercise-specific state folded from accepted observations.
///
/// Only observations that passed the confidence filter reach `observe`;
/// frames without one leave the tracker untouched.
pub trait PhaseTracker {
    type Metrics: Clone;

    fn observe(&mut self, observation: &Observation);

    fn current_metrics(&self) -> Self::Metrics;

    /// Whether the session has produced anything worth reporting yet.
    fn is_conclusive(&self) -> bool;

    /// Divisor applied to raw elapsed times. Only timing trackers care.
    fn calibrate(&mut self, _time_scale: f64) {}
}

/// 会话结束时的结果
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSummary<M> {
    Measured { metrics: M, frames: u64 },
    /// 整个会话没有得到可用的测量，与测得 0 不同
    Inconclusive { frames: u64 },
}

impl<M> SessionSummary<M> {
    pub fn metrics(&self) -> Option<&M> {
        match self {
            SessionSummary::Measured { metrics, .. } => Some(metrics),
            SessionSummary::Inconclusive { .. } => None,
        }
    }

    pub fn frames(&self) -> u64 {
        match self {
            SessionSummary::Measured { frames, .. } | SessionSummary::Inconclusive { frames } => {
                *frames
            }
        }
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self, SessionSummary::Inconclusive { .. })
    }
}
