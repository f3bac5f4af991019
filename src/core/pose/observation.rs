use std::time::Duration;

use super::label::PoseLabel;

/// One detected person's classification for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosePrediction {
    pub label: PoseLabel,
    pub confidence: f32,
}

impl PosePrediction {
    pub fn new(label: PoseLabel, confidence: f32) -> Self {
        Self { label, confidence }
    }

    /// 从模型输出的类别概率构造预测
    ///
    /// 取最大概率的类别（并列时取靠前的）。该类别不是 sit/stand 时返回 `None`，
    /// 这里不做置信度过滤，交给 [`ObservationFilter`](super::ObservationFilter)。
    pub fn from_scores(class_names: &[&str], scores: &[f32]) -> Option<Self> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, &score) in scores.iter().enumerate().take(class_names.len()) {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((idx, score)),
            }
        }

        let (idx, confidence) = best?;
        let label = PoseLabel::from_class_name(class_names[idx])?;
        Some(Self { label, confidence })
    }
}

/// An accepted reading: the prediction that governs a frame, stamped with
/// the session-relative time it was observed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub label: PoseLabel,
    pub confidence: f32,
    pub timestamp: Duration,
}

impl Observation {
    pub fn new(label: PoseLabel, confidence: f32, timestamp: Duration) -> Self {
        Self {
            label,
            confidence,
            timestamp,
        }
    }
}
