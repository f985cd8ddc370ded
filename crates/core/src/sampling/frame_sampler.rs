use std::path::{Path, PathBuf};

use crate::sampling::sampled_frame::SampledFrame;
use crate::shared::constants::{FRAME_FILE_PREFIX, FRAME_FILE_SUFFIX};
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::domain::video_reader::VideoReader;

/// Decodes a video front to back and keeps every `interval`-th frame
/// (indices 0, N, 2N, ...) as a temporary JPEG in `work_dir`.
///
/// Sampling never fails as a whole: a video that can't be opened, or that
/// has no frames, yields an empty list and the caller decides what that
/// means.
pub struct FrameSampler {
    reader: Box<dyn VideoReader>,
    writer: Box<dyn ImageWriter>,
    interval: usize,
    max_frames: Option<usize>,
    work_dir: PathBuf,
}

impl FrameSampler {
    pub fn new(
        reader: Box<dyn VideoReader>,
        writer: Box<dyn ImageWriter>,
        interval: usize,
        max_frames: Option<usize>,
        work_dir: PathBuf,
    ) -> Result<Self, &'static str> {
        if interval < 1 {
            return Err("sample interval must be >= 1");
        }
        if max_frames == Some(0) {
            return Err("max sampled frames must be >= 1");
        }
        Ok(Self {
            reader,
            writer,
            interval,
            max_frames,
            work_dir,
        })
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn sample(&mut self, video: &Path) -> Vec<SampledFrame> {
        let metadata = match self.reader.open(video) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("Could not open video {}: {e}", video.display());
                return Vec::new();
            }
        };

        let expected = metadata.expected_samples(self.interval).unwrap_or(0);
        let capacity = self.max_frames.map_or(expected, |cap| expected.min(cap));
        let mut sampled = Vec::with_capacity(capacity);
        let mut decoded = 0usize;

        for result in self.reader.frames() {
            let frame = match result {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!(
                        "Decoding {} stopped after {decoded} frames: {e}",
                        video.display()
                    );
                    break;
                }
            };
            let position = decoded;
            decoded += 1;

            if position % self.interval != 0 {
                continue;
            }

            match store(self.writer.as_ref(), &self.work_dir, &frame) {
                Ok(file) => sampled.push(SampledFrame::new(position, file)),
                Err(e) => log::warn!("Dropping frame {position}: could not write image: {e}"),
            }

            if self.max_frames.is_some_and(|cap| sampled.len() >= cap) {
                log::warn!(
                    "Reached the limit of {} sampled frames; ignoring the rest of {}",
                    sampled.len(),
                    video.display()
                );
                break;
            }
        }
        self.reader.close();

        if sampled.is_empty() {
            log::warn!("No frames sampled from {}", video.display());
        } else {
            log::debug!(
                "Sampled {} of {decoded} frames from {}",
                sampled.len(),
                video.display()
            );
        }
        sampled
    }
}

fn store(
    writer: &dyn ImageWriter,
    dir: &Path,
    frame: &Frame,
) -> Result<tempfile::TempPath, Box<dyn std::error::Error>> {
    let file = tempfile::Builder::new()
        .prefix(FRAME_FILE_PREFIX)
        .suffix(FRAME_FILE_SUFFIX)
        .tempfile_in(dir)?
        .into_temp_path();
    writer.write(&file, frame)?;
    Ok(file)
}
