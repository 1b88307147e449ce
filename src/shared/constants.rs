pub const ERROR_LOG_FILE: &str = "error.log";
pub const DEBUG_LOG_FILE: &str = "debug.log";

pub const PNG_EXTENSION: &str = "png";
pub const JPG_EXTENSION: &str = "jpg";

/// Source stems containing this marker keep only the text after it.
pub const IMAGE_STEM_MARKER: &str = "image_";

pub const JPEG_QUALITY: u8 = 95;

pub const DEFAULT_FRAME_PREFIX: &str = "frame";
pub const DEFAULT_FRAME_STEP: u64 = 1;
pub const FRAME_INDEX_WIDTH: usize = 6;
