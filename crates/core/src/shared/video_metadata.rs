use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Container-reported frame count; 0 when the container doesn't say.
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Upper bound on how many frames sampling at `interval` would keep,
    /// or `None` when the container doesn't report a frame count.
    pub fn expected_samples(&self, interval: usize) -> Option<usize> {
        if self.total_frames == 0 || interval == 0 {
            return None;
        }
        Some(self.total_frames.div_ceil(interval))
    }
}
