use std::path::Path;

use crate::evaluation::domain::comparison_result::ComparisonResult;
use crate::evaluation::domain::frame_verdict::FrameVerdict;
use crate::sampling::sampled_frame::SampledFrame;
use crate::verification::domain::face_verifier::FaceVerifier;

/// Puts every sampled frame to the verifier against the reference image
/// and takes a strict-majority vote.
///
/// A frame the verifier fails on is skipped but stays in the denominator.
/// All frames are evaluated even once the outcome is decided.
pub struct MatchEvaluator {
    verifier: Box<dyn FaceVerifier>,
}

impl MatchEvaluator {
    pub fn new(verifier: Box<dyn FaceVerifier>) -> Self {
        Self { verifier }
    }

    pub fn evaluate(&mut self, reference: &Path, frames: &[SampledFrame]) -> ComparisonResult {
        let mut matches = 0usize;
        let mut skipped = 0usize;
        let mut last_outcome = None;

        for frame in frames {
            let verdict =
                FrameVerdict::from_result(self.verifier.verify(reference, frame.path()));
            if verdict.is_match() {
                matches += 1;
            }
            match verdict {
                FrameVerdict::Evaluated(outcome) => {
                    log::debug!("Frame {}: verified={}", frame.index(), outcome.verified);
                    last_outcome = Some(outcome);
                }
                FrameVerdict::Skipped(reason) => {
                    log::warn!("Skipping frame {}: {reason}", frame.index());
                    skipped += 1;
                }
            }
        }

        ComparisonResult::new(frames.len(), skipped, matches, last_outcome)
    }
}
