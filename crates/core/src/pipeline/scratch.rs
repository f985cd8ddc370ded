use tempfile::TempPath;

/// Temporary files owned by one request. Everything still held is deleted
/// when the scratch goes out of scope, whichever way the request ends.
#[derive(Default)]
pub(crate) struct Scratch {
    files: Vec<TempPath>,
}

impl Scratch {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl Extend<TempPath> for Scratch {
    fn extend<I: IntoIterator<Item = TempPath>>(&mut self, iter: I) {
        self.files.extend(iter);
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        for file in self.files.drain(..) {
            let path = file.to_path_buf();
            if let Err(e) = file.close() {
                log::warn!("Could not remove temporary file {}: {e}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_in(dir: &std::path::Path) -> TempPath {
        tempfile::NamedTempFile::new_in(dir).unwrap().into_temp_path()
    }

    #[test]
    fn test_drop_removes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut scratch = Scratch::new();
        scratch.extend(Some(temp_in(dir.path())));
        scratch.extend([temp_in(dir.path()), temp_in(dir.path())]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);

        drop(scratch);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_already_removed_file_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let file = temp_in(dir.path());
        std::fs::remove_file(&file).unwrap();

        let mut scratch = Scratch::new();
        scratch.extend(Some(file));
        drop(scratch);
    }
}
