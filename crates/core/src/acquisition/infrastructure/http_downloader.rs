use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use tempfile::TempPath;

use crate::acquisition::domain::acquisition_error::AcquisitionError;
use crate::shared::constants::DOWNLOAD_FILE_PREFIX;

const CHUNK_SIZE: usize = 1024 * 1024;

/// Blocking HTTP GET into a uniquely named temporary file.
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl HttpDownloader {
    /// `timeout` bounds the whole transfer; `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Streams `url` into `dir` as `input_<random><suffix>`.
    ///
    /// Errors name `identifier`, the reference exactly as the caller wrote
    /// it, rather than the normalized URL. A partially written file never
    /// survives a failure: the temporary file is deleted when it is dropped
    /// on the error path.
    pub fn download(
        &self,
        identifier: &str,
        url: &Url,
        dir: &Path,
        suffix: &str,
    ) -> Result<TempPath, AcquisitionError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| AcquisitionError::Download {
                identifier: identifier.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::Status {
                identifier: identifier.to_string(),
                status,
            });
        }

        let mut file = tempfile::Builder::new()
            .prefix(DOWNLOAD_FILE_PREFIX)
            .suffix(suffix)
            .tempfile_in(dir)
            .map_err(|e| AcquisitionError::Write {
                identifier: identifier.to_string(),
                path: dir.to_path_buf(),
                source: e,
            })?;
        let write_error = |path: &Path, source: std::io::Error| AcquisitionError::Write {
            identifier: identifier.to_string(),
            path: path.to_path_buf(),
            source,
        };

        let mut reader = response;
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut downloaded: u64 = 0;
        loop {
            let n = reader
                .read(&mut buf)
                .map_err(|source| AcquisitionError::Transfer {
                    identifier: identifier.to_string(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])
                .map_err(|e| write_error(file.path(), e))?;
            downloaded += n as u64;
        }
        file.flush().map_err(|e| write_error(file.path(), e))?;

        log::debug!(
            "Downloaded {identifier} ({downloaded} bytes) to {}",
            file.path().display()
        );
        Ok(file.into_temp_path())
    }
}


#[cfg(test)]
mod tests {
    use super::test_server::serve;
    use super::*;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_download_writes_body_with_suffix() {
        let (base, handle) = serve(200, b"fake video bytes".to_vec(), 1);
        let dir = tempfile::tempdir().unwrap();
        let downloader = HttpDownloader::new(None).unwrap();

        let url = Url::parse(&format!("{base}/clip.mp4")).unwrap();
        let temp = downloader.download(url.as_str(), &url, dir.path(), ".mp4").unwrap();
        handle.join().unwrap();

        assert_eq!(std::fs::read(&temp).unwrap(), b"fake video bytes");
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(DOWNLOAD_FILE_PREFIX), "{name}");
        assert!(name.ends_with(".mp4"), "{name}");
    }

    #[test]
    fn test_download_names_are_unique() {
        let (base, handle) = serve(200, b"x".to_vec(), 2);
        let dir = tempfile::tempdir().unwrap();
        let downloader = HttpDownloader::new(None).unwrap();
        let url = Url::parse(&format!("{base}/face.jpg")).unwrap();

        let a = downloader.download(url.as_str(), &url, dir.path(), ".jpg").unwrap();
        let b = downloader.download(url.as_str(), &url, dir.path(), ".jpg").unwrap();
        handle.join().unwrap();

        assert_ne!(a.to_path_buf(), b.to_path_buf());
    }

    #[test]
    fn test_error_status_leaves_no_file() {
        let (base, handle) = serve(404, b"not here".to_vec(), 1);
        let dir = tempfile::tempdir().unwrap();
        let downloader = HttpDownloader::new(None).unwrap();

        let url = Url::parse(&format!("{base}/missing.mp4")).unwrap();
        let err = downloader.download(url.as_str(), &url, dir.path(), ".mp4").unwrap_err();
        handle.join().unwrap();

        assert!(matches!(
            err,
            AcquisitionError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND
        ));
        assert!(err.to_string().contains("/missing.mp4"));
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_unreachable_host_is_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = HttpDownloader::new(Some(Duration::from_secs(5))).unwrap();

        let url = Url::parse("http://127.0.0.1:1/clip.mp4").unwrap();
        let err = downloader.download(url.as_str(), &url, dir.path(), ".mp4").unwrap_err();

        assert!(matches!(err, AcquisitionError::Download { .. }));
        assert!(err.to_string().contains("http://127.0.0.1:1/clip.mp4"));
        assert_eq!(entries(dir.path()), 0);
    }

    #[test]
    fn test_missing_target_dir_is_write_error() {
        let (base, handle) = serve(200, b"x".to_vec(), 1);
        let downloader = HttpDownloader::new(None).unwrap();

        let url = Url::parse(&format!("{base}/clip.mp4")).unwrap();
        let err = downloader
            .download(url.as_str(), &url, Path::new("/nonexistent/work/dir"), ".mp4")
            .unwrap_err();
        handle.join().unwrap();

        assert!(matches!(err, AcquisitionError::Write { .. }));
    }

    #[test]
    fn test_errors_name_identifier_as_written() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = HttpDownloader::new(Some(Duration::from_secs(5))).unwrap();

        for identifier in ["http://127.0.0.1:1/my clip.mp4", "HTTP://127.0.0.1:1/Clip.mp4"] {
            let url = Url::parse(identifier).unwrap();
            assert_ne!(url.as_str(), identifier);
            let err = downloader
                .download(identifier, &url, dir.path(), ".mp4")
                .unwrap_err();
            assert!(err.to_string().contains(identifier), "{err}");
        }
    }

    #[test]
    fn test_truncated_body_is_transfer_error() {
        use std::io::{BufRead, BufReader};
        use std::net::TcpListener;

        // Promises 100 bytes, sends 5, then hangs up.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 2 {
                line.clear();
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort")
                .unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let downloader = HttpDownloader::new(Some(Duration::from_secs(5))).unwrap();
        let identifier = format!("http://{addr}/clip.mp4");
        let url = Url::parse(&identifier).unwrap();
        let err = downloader
            .download(&identifier, &url, dir.path(), ".mp4")
            .unwrap_err();
        handle.join().unwrap();

        assert!(matches!(err, AcquisitionError::Transfer { .. }), "{err}");
        assert!(err.to_string().contains(&identifier));
        assert_eq!(entries(dir.path()), 0);
    }
}
