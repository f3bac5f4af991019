use crate::core::video::frame::Frame;

/// 归一化图像坐标下的关键点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub visibility: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }
}

/// Hip, knee and ankle of one leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegLandmarks {
    pub hip: Keypoint,
    pub knee: Keypoint,
    pub ankle: Keypoint,
}

impl LegLandmarks {
    pub fn min_visibility(&self) -> f32 {
        self.hip
            .visibility
            .min(self.knee.visibility)
            .min(self.ankle.visibility)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyLandmarks {
    pub left: LegLandmarks,
    pub right: LegLandmarks,
}

/// 关键点检测器接口（外部模型），没有检测到人时返回 `None`
pub trait LandmarkDetector: Send + Sync {
    fn detect(&self, frame: &Frame) -> Option<BodyLandmarks>;
}

pub struct MockLandmarkDetector {
    pattern: Option<Box<dyn Fn(u64) -> Option<BodyLandmarks> + Send + Sync>>,
}

impl MockLandmarkDetector {
    pub fn new() -> Self {
        Self { pattern: None }
    }

    pub fn with_pattern<F>(pattern: F) -> Self
    where
        F: Fn(u64) -> Option<BodyLandmarks> + Send + Sync + 'static,
    {
        Self {
            pattern: Some(Box::new(pattern)),
        }
    }
}

impl Default for MockLandmarkDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkDetector for MockLandmarkDetector {
    fn detect(&self, frame: &Frame) -> Option<BodyLandmarks> {
        self.pattern.as_ref().and_then(|p| p(frame.frame_number))
    }
}
