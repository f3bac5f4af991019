use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 分类器可识别的姿态。"未知姿态" 用 `Option::None` 表示。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseLabel {
    Sit,
    Stand,
}

#[derive(Debug, Error)]
#[error("Unknown pose class: {0}")]
pub struct UnknownPoseClass(pub String);

impl PoseLabel {
    /// Maps a classifier class name onto a label. Other classes yield `None`.
    pub fn from_class_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sit" | "sitting" => Some(PoseLabel::Sit),
            "stand" | "standing" => Some(PoseLabel::Stand),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PoseLabel::Sit => "sit",
            PoseLabel::Stand => "stand",
        }
    }
}

impl FromStr for PoseLabel {
    type Err = UnknownPoseClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_class_name(s).ok_or_else(|| UnknownPoseClass(s.to_string()))
    }
}

impl fmt::Display for PoseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
