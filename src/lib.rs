//! Two small media utilities sharing one library:
//! `convert-png-to-jpg` and `convert-video-to-frames`.

pub mod converter;
pub mod core;
pub mod decoder;
pub mod shared;
pub mod utils;
