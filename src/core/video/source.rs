//! 帧来源
//!
//! 摄像头和视频解码属于外部层，这里只有接口和两个简单实现：
//! 目录中的图片序列，以及内存中的帧列表。

use log::{debug, info};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::frame::Frame;
use crate::core::config::ConfigError;
use crate::core::error::SessionError;

const FRAME_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Ordered, pull-based producer of frames. `Ok(None)` is end of stream.
///
/// A source is owned by exactly one session. `release` is called once when
/// the session ends, after which the source yields nothing more.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SessionError>;

    fn release(&mut self) {}
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SessionError> {
        (**self).next_frame()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// 按文件名顺序读取目录中的图片，按采集帧率推算时间戳
pub struct ImageSequenceSource {
    dir: PathBuf,
    pending: VecDeque<PathBuf>,
    capture_fps: f64,
    next_number: u64,
}

impl ImageSequenceSource {
    pub fn open(dir: impl AsRef<Path>, capture_fps: f64) -> Result<Self, SessionError> {
        let dir = dir.as_ref().to_path_buf();
        if !capture_fps.is_finite() || capture_fps <= 0.0 {
            return Err(ConfigError::CaptureFps(capture_fps).into());
        }

        let entries = fs::read_dir(&dir).map_err(|e| SessionError::ResourceUnavailable {
            path: dir.clone(),
            reason: e.to_string(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && Self::is_frame_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        info!("📂 Opened image sequence {:?}: {} frames", dir, paths.len());
        Ok(Self {
            dir,
            pending: paths.into(),
            capture_fps,
            next_number: 0,
        })
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    fn is_frame_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                FRAME_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SessionError> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };

        let image = image::open(&path)
            .map_err(|source| SessionError::Decode {
                path: path.clone(),
                source,
            })?
            .to_rgba8();

        let frame_number = self.next_number;
        self.next_number += 1;
        let timestamp =
            Duration::from_nanos((frame_number as f64 * 1e9 / self.capture_fps).round() as u64);

        Ok(Some(Frame::from_image(image, timestamp, frame_number)))
    }

    fn release(&mut self) {
        debug!(
            "Releasing image sequence {:?} ({} frames unread)",
            self.dir,
            self.pending.len()
        );
        self.pending.clear();
    }
}

/// 内存帧列表，用于嵌入调用和测试
pub struct MemoryFrameSource {
    frames: VecDeque<Frame>,
}

impl MemoryFrameSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// `count` blank frames numbered from zero, `interval_ms` apart.
    pub fn blank(count: u64, interval_ms: u64) -> Self {
        let frames = (0..count)
            .map(|n| Frame::new(1, 1, vec![0, 0, 0, 255], n * interval_ms, n))
            .collect();
        Self::new(frames)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for MemoryFrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SessionError> {
        Ok(self.frames.pop_front())
    }

    fn release(&mut self) {
        self.frames.clear();
    }
}
