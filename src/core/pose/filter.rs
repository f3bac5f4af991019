use std::time::Duration;

use super::observation::{Observation, PosePrediction};

/// 置信度过滤器：为每一帧选出唯一起作用的观测
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationFilter {
    threshold: f32,
}

impl ObservationFilter {
    pub fn new() -> Self {
        Self::with_threshold(0.5)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn accepts(&self, confidence: f32) -> bool {
        confidence.is_finite() && confidence >= self.threshold
    }

    /// Picks the highest-confidence prediction at or above the threshold.
    /// Ties go to the first one encountered. `None` means the frame carries
    /// no usable pose and the phase state must be held.
    pub fn select(
        &self,
        predictions: &[PosePrediction],
        timestamp: Duration,
    ) -> Option<Observation> {
        let mut best: Option<&PosePrediction> = None;
        for prediction in predictions.iter().filter(|p| self.accepts(p.confidence)) {
            match best {
                Some(current) if prediction.confidence <= current.confidence => {}
                _ => best = Some(prediction),
            }
        }

        best.map(|p| Observation::new(p.label, p.confidence, timestamp))
    }
}

impl Default for ObservationFilter {
    fn default() -> Self {
        Self::new()
    }
}
