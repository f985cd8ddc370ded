use crate::shared::constants::{MATCH_MESSAGE, NO_MATCH_MESSAGE};
use crate::verification::domain::verification_outcome::VerificationOutcome;

/// Aggregate verdict for one video/image comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonResult {
    pub frames_sampled: usize,
    pub frames_skipped: usize,
    pub matches_found: usize,
    pub is_match: bool,
    pub message: &'static str,
    /// Outcome of the last frame the verifier judged, if any.
    pub last_outcome: Option<VerificationOutcome>,
}

impl ComparisonResult {
    pub fn new(
        frames_sampled: usize,
        frames_skipped: usize,
        matches_found: usize,
        last_outcome: Option<VerificationOutcome>,
    ) -> Self {
        let is_match = is_majority(matches_found, frames_sampled);
        Self {
            frames_sampled,
            frames_skipped,
            matches_found,
            is_match,
            message: if is_match { MATCH_MESSAGE } else { NO_MATCH_MESSAGE },
            last_outcome,
        }
    }
}

/// Strict majority: more than half of all sampled frames, skipped ones
/// included.
pub fn is_majority(matches: usize, total: usize) -> bool {
    matches * 2 > total
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, false)]
    #[case(1, 1, true)]
    #[case(1, 2, false)]
    #[case(2, 3, true)]
    #[case(2, 4, false)]
    #[case(3, 5, true)]
    #[case(50, 100, false)]
    #[case(51, 100, true)]
    fn test_is_majority(#[case] matches: usize, #[case] total: usize, #[case] expected: bool) {
        assert_eq!(is_majority(matches, total), expected);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ComparisonResult::new(3, 0, 2, None).message, MATCH_MESSAGE);
        assert_eq!(ComparisonResult::new(4, 0, 2, None).message, NO_MATCH_MESSAGE);
    }
}
