use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;

/// 会话级错误。逐帧的软性情况（没有置信姿态）不在这里，它们不会中断会话。
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Frame source unavailable at {path:?}: {reason}")]
    ResourceUnavailable { path: PathBuf, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode frame {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Landmark detector not configured")]
    LandmarkDetectorMissing,
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
}
