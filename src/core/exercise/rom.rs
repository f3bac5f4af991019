//! 膝关节活动度
//!
//! 膝角 = 髋-膝 与 踝-膝 两个向量的夹角，范围 [0, 180]，保留一位小数。
//! 腿伸直为 180°。

use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::pose::{BodyLandmarks, Keypoint, LandmarkDetector, LegLandmarks};
use crate::core::video::frame::Frame;
use crate::core::video::stream::FrameAnalyzer;

pub fn knee_angle(hip: Keypoint, knee: Keypoint, ankle: Keypoint) -> f32 {
    let radians =
        (ankle.y - knee.y).atan2(ankle.x - knee.x) - (hip.y - knee.y).atan2(hip.x - knee.x);
    let mut angle = radians.to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    (angle * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min: f32,
    pub max: f32,
}

impl AngleRange {
    fn new(angle: f32) -> Self {
        Self { min: angle, max: angle }
    }

    fn include(&mut self, angle: f32) {
        self.min = self.min.min(angle);
        self.max = self.max.max(angle);
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KneeAngles {
    pub left: Option<f32>,
    pub right: Option<f32>,
}

impl KneeAngles {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl fmt::Display for KneeAngles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |angle: Option<f32>| {
            angle
                .map(|a| format!("{:.1}", a))
                .unwrap_or_else(|| "--".to_string())
        };
        write!(f, "Left Knee: {}  Right Knee: {}", side(self.left), side(self.right))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RomMetrics {
    pub last: Option<KneeAngles>,
    pub left: Option<AngleRange>,
    pub right: Option<AngleRange>,
}

/// Per-session knee range-of-motion tracker. Legs whose landmarks are not
/// visible enough are skipped for that frame.
#[derive(Debug, Clone)]
pub struct RangeOfMotion {
    visibility_threshold: f32,
    last: Option<KneeAngles>,
    left: Option<AngleRange>,
    right: Option<AngleRange>,
    measured_frames: u64,
}

impl RangeOfMotion {
    pub fn new(visibility_threshold: f32) -> Self {
        Self {
            visibility_threshold,
            last: None,
            left: None,
            right: None,
            measured_frames: 0,
        }
    }

    pub fn observe(&mut self, landmarks: &BodyLandmarks) -> KneeAngles {
        let angles = KneeAngles {
            left: self.leg_angle(&landmarks.left),
            right: self.leg_angle(&landmarks.right),
        };
        if angles.is_empty() {
            return angles;
        }

        Self::extend(&mut self.left, angles.left);
        Self::extend(&mut self.right, angles.right);
        self.last = Some(angles);
        self.measured_frames += 1;
        angles
    }

    pub fn measured_frames(&self) -> u64 {
        self.measured_frames
    }

    pub fn metrics(&self) -> RomMetrics {
        RomMetrics {
            last: self.last,
            left: self.left,
            right: self.right,
        }
    }

    fn leg_angle(&self, leg: &LegLandmarks) -> Option<f32> {
        if leg.min_visibility() < self.visibility_threshold {
            return None;
        }
        Some(knee_angle(leg.hip, leg.knee, leg.ankle))
    }

    fn extend(range: &mut Option<AngleRange>, angle: Option<f32>) {
        let Some(angle) = angle else { return };
        match range {
            Some(r) => r.include(angle),
            None => *range = Some(AngleRange::new(angle)),
        }
    }
}

pub struct RomSession {
    detector: Arc<dyn LandmarkDetector>,
    tracker: RangeOfMotion,
}

impl RomSession {
    pub fn new(detector: Arc<dyn LandmarkDetector>, tracker: RangeOfMotion) -> Self {
        Self { detector, tracker }
    }
}

impl FrameAnalyzer for RomSession {
    type Metrics = RomMetrics;

    fn analyze(&mut self, frame: &Frame, _timestamp: Duration) -> RomMetrics {
        match self.detector.detect(frame) {
            Some(landmarks) => {
                let angles = self.tracker.observe(&landmarks);
                trace!("Frame {}: {}", frame.frame_number, angles);
            }
            None => trace!("Frame {}: no landmarks", frame.frame_number),
        }
        self.tracker.metrics()
    }

    fn current_metrics(&self) -> RomMetrics {
        self.tracker.metrics()
    }

    fn is_conclusive(&self) -> bool {
        self.tracker.measured_frames() > 0
    }
}
