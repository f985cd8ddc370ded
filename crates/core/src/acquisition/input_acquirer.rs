use std::path::PathBuf;

use crate::acquisition::domain::acquired_input::AcquiredInput;
use crate::acquisition::domain::acquisition_error::AcquisitionError;
use crate::acquisition::domain::resource_ref::{download_suffix, MediaKind, ResourceRef};
use crate::acquisition::infrastructure::http_downloader::HttpDownloader;

/// Resolves request identifiers into local files.
///
/// Remote URLs are downloaded into `work_dir`; local paths are checked for
/// existence and used in place.
pub struct InputAcquirer {
    downloader: HttpDownloader,
    work_dir: PathBuf,
    media_root: Option<PathBuf>,
}

impl InputAcquirer {
    pub fn new(downloader: HttpDownloader, work_dir: PathBuf, media_root: Option<PathBuf>) -> Self {
        Self {
            downloader,
            work_dir,
            media_root,
        }
    }

    pub fn acquire(
        &self,
        identifier: &str,
        kind: MediaKind,
    ) -> Result<AcquiredInput, AcquisitionError> {
        match ResourceRef::parse(identifier).resolve_against(self.media_root.as_deref()) {
            ResourceRef::Remote(url) => {
                let suffix = download_suffix(&url, kind);
                let temp = self
                    .downloader
                    .download(identifier, &url, &self.work_dir, &suffix)?;
                log::info!("Fetched {kind} {identifier} -> {}", temp.display());
                Ok(AcquiredInput::downloaded(temp))
            }
            ResourceRef::Local(path) => {
                if !path.is_file() {
                    return Err(AcquisitionError::NotFound {
                        kind: kind.to_string(),
                        identifier: identifier.to_string(),
                    });
                }
                Ok(AcquiredInput::local(path))
            }
        }
    }
}
