use anyhow::{anyhow, Context, Result};
use opencv::{core::Mat, prelude::*, videoio};
use std::path::{Path, PathBuf};

use super::FrameSource;
use crate::utils::logger;

/// OpenCV-backed video reader yielding BGR frames.
pub struct VideoDecoder {
    capture: videoio::VideoCapture,
    path: PathBuf,
}

impl VideoDecoder {
    pub fn open(path: &Path) -> Result<Self> {
        let path_str = path
            .to_str()
            .ok_or_else(|| anyhow!("Cannot open video: {} (path is not valid UTF-8)", path.display()))?;

        logger::debug(&format!("Opening video with OpenCV: {}", path_str));

        // CAP_ANY lets OpenCV pick the backend (FFmpeg/GStreamer/AVFoundation/MSMF)
        let capture = videoio::VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .with_context(|| format!("Cannot open video: {}", path.display()))?;

        if !capture.is_opened()? {
            let err_msg = format!("Cannot open video: {}", path.display());
            logger::error(&err_msg);
            return Err(anyhow!(err_msg));
        }

        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;

        logger::debug(&format!(
            "VideoCapture opened: {}x{} @ {:.3} fps, ~{} frames",
            width, height, fps, frame_count as i64
        ));

        Ok(Self {
            capture,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn release(&mut self) -> Result<()> {
        self.capture
            .release()
            .with_context(|| format!("Failed to release video: {}", self.path.display()))
    }
}

impl FrameSource for VideoDecoder {
    type Frame = Mat;

    fn read_frame(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? {
            return Ok(None); // EOF
        }

        if frame.empty() {
            return Ok(None);
        }

        Ok(Some(frame))
    }
}
