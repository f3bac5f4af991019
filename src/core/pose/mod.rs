//! 姿态输入 - 分类器输出、置信度过滤、关键点
//!
//! 分类模型本身不在本 crate 内，这里只定义它的接口和输出的筛选规则。

pub mod classifier;
pub mod filter;
pub mod label;
pub mod landmark;
pub mod observation;

pub use classifier::{MockPoseClassifier, PoseClassifier};
pub use filter::ObservationFilter;
pub use label::{PoseLabel, UnknownPoseClass};
pub use landmark::{BodyLandmarks, Keypoint, LandmarkDetector, LegLandmarks, MockLandmarkDetector};
pub use observation::{Observation, PosePrediction};
