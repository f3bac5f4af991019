use serde::{Deserialize, Serialize};

use crate::core::exercise::{AngleRange, RomMetrics, SessionSummary, StsMetrics, TugMetrics};

/// 分析类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseKind {
    /// 坐立计数
    #[serde(rename = "sts")]
    SitToStand,
    /// 起立行走计时
    #[serde(rename = "tug")]
    TimedUpAndGo,
    /// 膝关节活动度
    #[serde(rename = "rom")]
    RangeOfMotion,
}

/// Session result in a shape the web layer can serialize as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseReport {
    pub kind: ExerciseKind,
    pub frames: u64,
    /// `false` 表示整个会话没有得到测量结果
    pub conclusive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_secs: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transition_history_secs: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_knee: Option<AngleRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_knee: Option<AngleRange>,
}

impl ExerciseReport {
    fn empty(kind: ExerciseKind, frames: u64) -> Self {
        Self {
            kind,
            frames,
            conclusive: false,
            rep_count: None,
            last_transition_secs: None,
            transition_history_secs: Vec::new(),
            left_knee: None,
            right_knee: None,
        }
    }

    pub fn from_sts(summary: &SessionSummary<StsMetrics>) -> Self {
        let mut report = Self::empty(ExerciseKind::SitToStand, summary.frames());
        if let Some(metrics) = summary.metrics() {
            report.conclusive = true;
            report.rep_count = Some(metrics.rep_count);
        }
        report
    }

    pub fn from_tug(summary: &SessionSummary<TugMetrics>) -> Self {
        let mut report = Self::empty(ExerciseKind::TimedUpAndGo, summary.frames());
        if let Some(metrics) = summary.metrics() {
            report.conclusive = true;
            report.last_transition_secs = metrics.last_transition.map(|d| d.as_secs_f64());
            report.transition_history_secs =
                metrics.history.iter().map(|d| d.as_secs_f64()).collect();
        }
        report
    }

    pub fn from_rom(summary: &SessionSummary<RomMetrics>) -> Self {
        let mut report = Self::empty(ExerciseKind::RangeOfMotion, summary.frames());
        if let Some(metrics) = summary.metrics() {
            report.conclusive = true;
            report.left_knee = metrics.left;
            report.right_knee = metrics.right;
        }
        report
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
