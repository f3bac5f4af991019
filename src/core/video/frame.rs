use image::RgbaImage;
use std::time::Duration;

/// 帧数据结构
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // RGBA 格式
    /// 相对于采集开始的时间
    pub timestamp: Duration,
    pub frame_number: u64,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        data: Vec<u8>,
        timestamp_ms: u64,
        frame_number: u64,
    ) -> Self {
        Self {
            width,
            height,
            data,
            timestamp: Duration::from_millis(timestamp_ms),
            frame_number,
        }
    }

    pub fn from_image(image: RgbaImage, timestamp: Duration, frame_number: u64) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            data: image.into_raw(),
            timestamp,
            frame_number,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// 数据长度与宽高不符时返回 `None`
    pub fn to_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }

    /// Scales the frame to a model's input size, keeping timestamp and number.
    pub fn resize_to(&self, target_width: u32, target_height: u32) -> Option<Frame> {
        let resized = image::imageops::resize(
            &self.to_image()?,
            target_width,
            target_height,
            image::imageops::FilterType::Triangle,
        );
        Some(Frame::from_image(resized, self.timestamp, self.frame_number))
    }

    /// 分类模型通常只接受 RGB 输入
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixel_count() * 3);
        for chunk in self.data.chunks_exact(4) {
            rgb.push(chunk[0]); // R
            rgb.push(chunk[1]); // G
            rgb.push(chunk[2]); // B
        }
        rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let data = vec![255u8; 100 * 100 * 4];
        let frame = Frame::new(100, 100, data, 1000, 30);

        assert_eq!(frame.width, 100);
        assert_eq!(frame.height, 100);
        assert_eq!(frame.pixel_count(), 10000);
        assert_eq!(frame.timestamp.as_millis(), 1000);
        assert_eq!(frame.frame_number, 30);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_pixel_count_beyond_u32() {
        // 只用宽高，不分配像素
        let frame = Frame::new(100_000, 100_000, Vec::new(), 0, 0);
        assert_eq!(frame.pixel_count(), 10_000_000_000);
    }

    #[test]
    fn test_frame_from_image() {
        let image = RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]));
        let frame = Frame::from_image(image, Duration::from_millis(500), 7);

        assert_eq!((frame.width, frame.height), (4, 3));
        assert_eq!(frame.data.len(), 4 * 3 * 4);
        assert_eq!(frame.timestamp, Duration::from_millis(500));
    }

    #[test]
    fn test_resize_keeps_timing() {
        let frame = Frame::new(8, 6, vec![128u8; 8 * 6 * 4], 2000, 60);
        let resized = frame.resize_to(4, 3).unwrap();

        assert_eq!((resized.width, resized.height), (4, 3));
        assert_eq!(resized.data.len(), 4 * 3 * 4);
        assert_eq!(resized.timestamp, frame.timestamp);
        assert_eq!(resized.frame_number, 60);
    }

    #[test]
    fn test_resize_rejects_truncated_data() {
        let frame = Frame::new(8, 6, vec![0u8; 10], 0, 0);
        assert!(frame.to_image().is_none());
        assert!(frame.resize_to(4, 3).is_none());
    }

    #[test]
    fn test_to_rgb_drops_alpha() {
        let frame = Frame::new(1, 2, vec![1, 2, 3, 255, 4, 5, 6, 255], 0, 0);
        assert_eq!(frame.to_rgb(), vec![1, 2, 3, 4, 5, 6]);
    }
}
