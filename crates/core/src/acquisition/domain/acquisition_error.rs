use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a resource identifier into a readable local file.
///
/// Every variant names the identifier the caller supplied.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("{kind} not found: {identifier}")]
    NotFound { kind: String, identifier: String },
    #[error("download failed for {identifier}: {source}")]
    Download {
        identifier: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("download failed for {identifier}: server responded {status}")]
    Status {
        identifier: String,
        status: reqwest::StatusCode,
    },
    #[error("download of {identifier} was interrupted: {source}")]
    Transfer {
        identifier: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {identifier} to {path}: {source}")]
    Write {
        identifier: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
