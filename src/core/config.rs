//! 会话配置

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::exercise::Phase;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("confidence_threshold must be within [0, 1], got {0}")]
    ConfidenceThreshold(f32),
    #[error("visibility_threshold must be within [0, 1], got {0}")]
    VisibilityThreshold(f32),
    #[error("capture_fps must be a positive number, got {0}")]
    CaptureFps(f64),
}

/// Which clock stamps accepted observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBase {
    /// Capture-relative frame timestamps. Durations are already real time.
    #[default]
    Capture,
    /// Monotonic processing clock. Durations are rescaled by the measured
    /// ratio of processing time to capture time.
    Processing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 低于该置信度的预测不会改变状态
    pub confidence_threshold: f32,
    /// 坐立计数的初始阶段。`None` 时取第一次接受的观测
    pub initial_phase: Option<Phase>,
    pub time_base: TimeBase,
    /// 图像序列的采集帧率，用于推算帧时间戳
    pub capture_fps: f64,
    /// 关键点可见度阈值（ROM）
    pub visibility_threshold: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            initial_phase: None,
            time_base: TimeBase::Capture,
            capture_fps: 30.0,
            visibility_threshold: 0.5,
        }
    }
}

impl SessionConfig {
    pub fn for_recorded_video() -> Self {
        Self::default()
    }

    pub fn for_live_camera() -> Self {
        Self {
            time_base: TimeBase::Processing,
            ..Self::default()
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::ConfidenceThreshold(self.confidence_threshold));
        }
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(ConfigError::VisibilityThreshold(self.visibility_threshold));
        }
        if !self.capture_fps.is_finite() || self.capture_fps <= 0.0 {
            return Err(ConfigError::CaptureFps(self.capture_fps));
        }
        Ok(())
    }
}
