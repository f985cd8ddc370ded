use std::path::Path;

use tempfile::TempPath;

/// One retained video frame, stored as a temporary image file that is
/// deleted when this value (or its `TempPath`) goes away.
#[derive(Debug)]
pub struct SampledFrame {
    index: usize,
    file: TempPath,
}

impl SampledFrame {
    pub fn new(index: usize, file: TempPath) -> Self {
        Self { index, file }
    }

    /// Position of the frame in the source video.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    pub fn into_temp_path(self) -> TempPath {
        self.file
    }
}
