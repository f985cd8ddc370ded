use std::path::{Path, PathBuf};

use tempfile::TempPath;

/// A locally readable input. Downloads carry the owning temporary file;
/// caller-supplied local files do not and are never deleted.
#[derive(Debug)]
pub struct AcquiredInput {
    path: PathBuf,
    download: Option<TempPath>,
}

impl AcquiredInput {
    pub fn local(path: PathBuf) -> Self {
        Self {
            path,
            download: None,
        }
    }

    pub fn downloaded(download: TempPath) -> Self {
        Self {
            path: download.to_path_buf(),
            download: Some(download),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Splits into the readable path and the temporary file (if any) that
    /// the caller now has to delete.
    pub fn into_parts(self) -> (PathBuf, Option<TempPath>) {
        (self.path, self.download)
    }
}
