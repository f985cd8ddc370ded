//! Wire types for the compare-faces endpoint and the mapping from
//! failures to HTTP status codes.

use serde::Serialize;
use thiserror::Error;

use facematch_core::evaluation::domain::comparison_result::ComparisonResult;
use facematch_core::pipeline::compare_faces_use_case::CompareError;
use facematch_core::verification::domain::verification_outcome::VerificationOutcome;

#[derive(Serialize, Debug, PartialEq)]
pub struct CompareFacesResponse {
    #[serde(rename = "match")]
    pub is_match: bool,
    #[serde(rename = "matchesFound")]
    pub matches_found: usize,
    pub message: String,
    pub result: Option<VerificationOutcome>,
}

impl From<ComparisonResult> for CompareFacesResponse {
    fn from(result: ComparisonResult) -> Self {
        Self {
            is_match: result.is_match,
            matches_found: result.matches_found,
            message: result.message.to_string(),
            result: result.last_outcome,
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Compare(#[from] CompareError),
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error("could not read request body: {0}")]
    UnreadableBody(#[source] std::io::Error),
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: u64 },
    #[error("Not Found")]
    NotFound,
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("could not listen on {addr}: {reason}")]
    Bind { addr: String, reason: String },
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Compare(CompareError::Acquisition(_) | CompareError::NoFrames) => 400,
            Self::Compare(CompareError::Workspace { .. }) | Self::Bind { .. } => 500,
            Self::InvalidBody(_) => 422,
            Self::UnreadableBody(_) => 400,
            Self::BodyTooLarge { .. } => 413,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            detail: self.to_string(),
        }
    }
}
