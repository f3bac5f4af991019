use crate::core::video::frame::Frame;

use super::label::PoseLabel;
use super::observation::PosePrediction;

/// 姿态分类器接口（外部模型）
///
/// 每个检测到的人返回一个预测，没有检测到人时返回空列表。
pub trait PoseClassifier: Send + Sync {
    fn classify(&self, frame: &Frame) -> Vec<PosePrediction>;
}

pub struct MockPoseClassifier {
    // 按帧编号给出预测
    pattern: Option<Box<dyn Fn(u64) -> Vec<PosePrediction> + Send + Sync>>,
}

impl MockPoseClassifier {
    pub fn new() -> Self {
        Self { pattern: None }
    }

    pub fn with_pattern<F>(pattern: F) -> Self
    where
        F: Fn(u64) -> Vec<PosePrediction> + Send + Sync + 'static,
    {
        Self {
            pattern: Some(Box::new(pattern)),
        }
    }

    /// One label per frame number, all at the same confidence. `None` entries
    /// and frames past the end of the script detect nobody.
    pub fn from_labels(labels: Vec<Option<PoseLabel>>, confidence: f32) -> Self {
        Self::with_pattern(move |frame_number| {
            labels
                .get(frame_number as usize)
                .copied()
                .flatten()
                .map(|label| vec![PosePrediction::new(label, confidence)])
                .unwrap_or_default()
        })
    }
}

impl Default for MockPoseClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseClassifier for MockPoseClassifier {
    fn classify(&self, frame: &Frame) -> Vec<PosePrediction> {
        self.pattern
            .as_ref()
            .map(|p| p(frame.frame_number))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_frame(frame_number: u64) -> Frame {
        Frame::new(2, 2, vec![0u8; 16], frame_number * 33, frame_number)
    }

    #[test]
    fn test_mock_without_pattern_detects_nobody() {
        let classifier = MockPoseClassifier::new();
        assert!(classifier.classify(&blank_frame(0)).is_empty());
    }

    #[test]
    fn test_mock_from_labels() {
        let labels = vec![Some(PoseLabel::Sit), None, Some(PoseLabel::Stand)];
        let classifier = MockPoseClassifier::from_labels(labels, 0.9);

        assert_eq!(
            classifier.classify(&blank_frame(0)),
            vec![PosePrediction::new(PoseLabel::Sit, 0.9)]
        );
        assert!(classifier.classify(&blank_frame(1)).is_empty());
        assert_eq!(classifier.classify(&blank_frame(2))[0].label, PoseLabel::Stand);
        assert!(classifier.classify(&blank_frame(7)).is_empty());
    }

    #[test]
    fn test_mock_multiple_people() {
        let classifier = MockPoseClassifier::with_pattern(|_| {
            vec![
                PosePrediction::new(PoseLabel::Sit, 0.4),
                PosePrediction::new(PoseLabel::Stand, 0.8),
            ]
        });
        assert_eq!(classifier.classify(&blank_frame(3)).len(), 2);
    }
}
