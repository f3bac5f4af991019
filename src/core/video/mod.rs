pub mod frame;
pub mod source;
pub mod stream;

pub use frame::Frame;
pub use source::{FrameSource, ImageSequenceSource, MemoryFrameSource};
pub use stream::{FrameAnalyzer, FrameReport, SessionStream, StopHandle};
