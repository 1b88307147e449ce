pub mod video;

pub use video::VideoDecoder;

use anyhow::Result;

/// A sequential stream of decoded frames.
pub trait FrameSource {
    type Frame;

    /// `Ok(None)` marks the end of the stream.
    fn read_frame(&mut self) -> Result<Option<Self::Frame>>;
}
