pub mod api;
pub mod core;

pub use crate::api::exercise::ExerciseAnalyzer;
pub use crate::api::models::{ExerciseKind, ExerciseReport};
pub use crate::core::config::{ConfigError, SessionConfig, TimeBase};
pub use crate::core::error::SessionError;
pub use crate::core::exercise::{Phase, PhaseTracker, SessionSummary};
pub use crate::core::pose::{
    Observation, ObservationFilter, PoseClassifier, PoseLabel, PosePrediction,
};
pub use crate::core::video::{Frame, FrameSource, SessionStream, StopHandle};

pub fn init_logging() {
    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag("rehab_metrics"),
        );
    }

    #[cfg(not(target_os = "android"))]
    {
        // 已经初始化过时忽略错误
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }
}
