use std::path::Path;

use crate::verification::domain::verification_outcome::VerificationOutcome;

/// Judges whether two images show the same person.
///
/// This is the only seam between orchestration and face recognition. An
/// `Err` means the pair could not be judged at all (unreadable file,
/// inference failure); "no face found" is not an error unless the
/// implementation was configured to enforce detection.
pub trait FaceVerifier: Send {
    fn verify(
        &mut self,
        reference: &Path,
        candidate: &Path,
    ) -> Result<VerificationOutcome, Box<dyn std::error::Error>>;
}
