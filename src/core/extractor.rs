use anyhow::{anyhow, Context, Result};
use opencv::{core::Mat, core::Vector, imgcodecs};
use std::path::{Path, PathBuf};

use crate::decoder::{FrameSource, VideoDecoder};
use crate::shared::constants::FRAME_INDEX_WIDTH;
use crate::utils::{file_utils, logger, time_utils::Timer};

/// Persists one decoded frame.
pub trait FrameWriter<F> {
    fn write_frame(&mut self, frame: &F, path: &Path) -> Result<()>;
}

/// Writes OpenCV frames as PNG via `imwrite`.
pub struct PngFrameWriter;

impl FrameWriter<Mat> for PngFrameWriter {
    fn write_frame(&mut self, frame: &Mat, path: &Path) -> Result<()> {
        let path_str = path
            .to_str()
            .ok_or_else(|| anyhow!("Frame path is not valid UTF-8: {}", path.display()))?;

        let written = imgcodecs::imwrite(path_str, frame, &Vector::<i32>::new())
            .with_context(|| format!("Failed to write frame: {}", path.display()))?;
        if !written {
            anyhow::bail!("Failed to write frame: {}", path.display());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub frames_read: u64,
    pub frames_saved: u64,
    pub output_dir: PathBuf,
}

/// `frame_000042.png`
pub fn frame_file_name(prefix: &str, index: u64) -> String {
    format!("{}_{:0width$}.png", prefix, index, width = FRAME_INDEX_WIDTH)
}

/// Saves every `step`-th frame of `video` into `output_dir` as PNG.
pub fn video_to_frames(video: &Path, output_dir: &Path, prefix: &str, step: u64) -> Result<ExtractionReport> {
    file_utils::ensure_dir(output_dir)?;

    let mut decoder = VideoDecoder::open(video)?;
    let report = extract_frames(&mut decoder, &mut PngFrameWriter, output_dir, prefix, step)?;
    decoder.release()?;

    logger::info(&format!(
        "{}: read {} frames, saved {}",
        decoder.path().display(),
        report.frames_read,
        report.frames_saved
    ));
    println!("Saved {} frames to {}", report.frames_saved, output_dir.display());

    Ok(report)
}

/// Core stride loop. Frames `0, step, 2*step, ...` are written with consecutive
/// indices starting at 0. A read error ends the stream like EOF does.
pub fn extract_frames<S, W>(
    source: &mut S,
    writer: &mut W,
    output_dir: &Path,
    prefix: &str,
    step: u64,
) -> Result<ExtractionReport>
where
    S: FrameSource,
    W: FrameWriter<S::Frame>,
{
    if step == 0 {
        anyhow::bail!("Frame step must be at least 1");
    }

    let timer = Timer::new();
    let mut frame_idx: u64 = 0;
    let mut saved_idx: u64 = 0;

    loop {
        let frame = match source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                logger::debug("Decoder EOF");
                break;
            }
            Err(e) => {
                logger::error(&format!("Frame read failed at {}: {:#}", frame_idx, e));
                break;
            }
        };

        if frame_idx % step == 0 {
            let path = output_dir.join(frame_file_name(prefix, saved_idx));
            writer.write_frame(&frame, &path)?;
            saved_idx += 1;
        }

        frame_idx += 1;
    }

    logger::debug(&format!(
        "extracted {}/{} frames (step {}) in {}ms",
        saved_idx,
        frame_idx,
        step,
        timer.elapsed_ms()
    ));

    Ok(ExtractionReport {
        frames_read: frame_idx,
        frames_saved: saved_idx,
        output_dir: output_dir.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::{core, prelude::*, videoio};

    /// Yields `0..count`, optionally failing instead of producing frame `fail_at`.
    struct CountingSource {
        next: u64,
        count: u64,
        fail_at: Option<u64>,
    }

    impl CountingSource {
        fn new(count: u64) -> Self {
            Self { next: 0, count, fail_at: None }
        }
    }

    impl FrameSource for CountingSource {
        type Frame = u64;

        fn read_frame(&mut self) -> Result<Option<u64>> {
            if self.fail_at == Some(self.next) {
                return Err(anyhow!("corrupt packet"));
            }
            if self.next >= self.count {
                return Ok(None);
            }
            let frame = self.next;
            self.next += 1;
            Ok(Some(frame))
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        written: Vec<(u64, String)>,
    }

    impl FrameWriter<u64> for RecordingWriter {
        fn write_frame(&mut self, frame: &u64, path: &Path) -> Result<()> {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            self.written.push((*frame, name));
            Ok(())
        }
    }

    fn run(count: u64, step: u64) -> (ExtractionReport, RecordingWriter) {
        let mut source = CountingSource::new(count);
        let mut writer = RecordingWriter::default();
        let report = extract_frames(&mut source, &mut writer, Path::new("out"), "frame", step).unwrap();
        (report, writer)
    }

    #[test]
    fn test_frame_file_name_padding() {
        assert_eq!(frame_file_name("frame", 0), "frame_000000.png");
        assert_eq!(frame_file_name("clip", 42), "clip_000042.png");
        assert_eq!(frame_file_name("f", 1_234_567), "f_1234567.png");
    }

    #[test]
    fn test_step_one_saves_every_frame() {
        let (report, writer) = run(5, 1);
        assert_eq!(report.frames_read, 5);
        assert_eq!(report.frames_saved, 5);
        let frames: Vec<u64> = writer.written.iter().map(|(f, _)| *f).collect();
        assert_eq!(frames, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_stride_writes_ceil_of_frames_over_step() {
        for (count, step) in [(10, 3), (9, 3), (1, 5), (7, 7), (8, 7), (100, 1)] {
            let (report, writer) = run(count, step);
            let expected = (count + step - 1) / step;
            assert_eq!(report.frames_saved, expected, "count={} step={}", count, step);
            assert_eq!(writer.written.len() as u64, expected);
        }
    }

    #[test]
    fn test_saved_frames_are_sequentially_indexed() {
        let (_, writer) = run(10, 3);
        assert_eq!(
            writer.written,
            vec![
                (0, "frame_000000.png".to_string()),
                (3, "frame_000001.png".to_string()),
                (6, "frame_000002.png".to_string()),
                (9, "frame_000003.png".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_video_saves_nothing() {
        let (report, writer) = run(0, 2);
        assert_eq!(report.frames_saved, 0);
        assert!(writer.written.is_empty());
    }

    #[test]
    fn test_read_error_ends_stream() {
        let mut source = CountingSource { next: 0, count: 10, fail_at: Some(4) };
        let mut writer = RecordingWriter::default();

        let report = extract_frames(&mut source, &mut writer, Path::new("out"), "frame", 2).unwrap();

        assert_eq!(report.frames_read, 4);
        assert_eq!(report.frames_saved, 2);
    }

    #[test]
    fn test_zero_step_rejected() {
        let mut source = CountingSource::new(3);
        let mut writer = RecordingWriter::default();
        assert!(extract_frames(&mut source, &mut writer, Path::new("out"), "frame", 0).is_err());
    }

    #[test]
    fn test_output_paths_use_dir_and_prefix() {
        struct PathWriter(Vec<PathBuf>);
        impl FrameWriter<u64> for PathWriter {
            fn write_frame(&mut self, _frame: &u64, path: &Path) -> Result<()> {
                self.0.push(path.to_path_buf());
                Ok(())
            }
        }

        let mut source = CountingSource::new(2);
        let mut writer = PathWriter(Vec::new());
        extract_frames(&mut source, &mut writer, Path::new("frames"), "shot", 1).unwrap();

        assert_eq!(
            writer.0,
            vec![
                Path::new("frames").join("shot_000000.png"),
                Path::new("frames").join("shot_000001.png"),
            ]
        );
    }

    #[test]
    fn test_video_to_frames_missing_video() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("frames");

        let err = video_to_frames(&tmp.path().join("nope.avi"), &out, "frame", 1).unwrap_err();

        assert!(err.to_string().starts_with("Cannot open video:"));
        assert!(out.is_dir());
    }

    fn solid_frame(width: i32, height: i32, bgr: (f64, f64, f64)) -> Mat {
        Mat::new_rows_cols_with_default(height, width, core::CV_8UC3, core::Scalar::new(bgr.0, bgr.1, bgr.2, 0.0))
            .unwrap()
    }

    /// Encodes `count` solid frames into an MJPG `.avi`.
    fn write_test_video(path: &Path, count: usize) {
        let fourcc = videoio::VideoWriter::fourcc('M', 'J', 'P', 'G').unwrap();
        let mut writer =
            videoio::VideoWriter::new(path.to_str().unwrap(), fourcc, 10.0, core::Size::new(64, 48), true).unwrap();
        assert!(writer.is_opened().unwrap());

        for i in 0..count {
            let shade = (i * 30) as f64;
            writer.write(&solid_frame(64, 48, (shade, 80.0, 200.0))).unwrap();
        }
        writer.release().unwrap();
    }

    #[test]
    fn test_png_frame_writer_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("frame_000000.png");

        // BGR on the OpenCV side, RGB once decoded
        let frame = solid_frame(8, 4, (255.0, 0.0, 0.0));
        PngFrameWriter.write_frame(&frame, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (8, 4));
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 255]);
    }

    #[test]
    fn test_png_frame_writer_missing_dir_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing").join("frame_000000.png");

        let err = PngFrameWriter.write_frame(&solid_frame(4, 4, (0.0, 0.0, 0.0)), &path).unwrap_err();

        assert!(err.to_string().starts_with("Failed to write frame"));
    }

    #[test]
    fn test_video_to_frames_writes_strided_pngs() {
        let tmp = tempfile::tempdir().unwrap();
        let video = tmp.path().join("clip.avi");
        let out = tmp.path().join("frames");
        write_test_video(&video, 7);

        let report = video_to_frames(&video, &out, "frame", 3).unwrap();

        assert_eq!(report.frames_read, 7);
        assert_eq!(report.frames_saved, 3);

        let mut names: Vec<String> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["frame_000000.png", "frame_000001.png", "frame_000002.png"]);

        for name in &names {
            let decoded = image::open(out.join(name)).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (64, 48));
        }
    }
}
