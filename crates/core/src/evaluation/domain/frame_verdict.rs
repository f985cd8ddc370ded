use crate::verification::domain::verification_outcome::VerificationOutcome;

/// What happened when one sampled frame was put to the verifier.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameVerdict {
    Evaluated(VerificationOutcome),
    /// The verifier failed on this frame; it still counts as sampled.
    Skipped(String),
}

impl FrameVerdict {
    pub fn from_result(result: Result<VerificationOutcome, Box<dyn std::error::Error>>) -> Self {
        match result {
            Ok(outcome) => Self::Evaluated(outcome),
            Err(e) => Self::Skipped(e.to_string()),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Evaluated(outcome) if outcome.verified)
    }
}
