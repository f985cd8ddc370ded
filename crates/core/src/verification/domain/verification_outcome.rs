use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Verdict for one image pair: a required `verified` flag plus whatever
/// diagnostics the verifier chose to report (distances, model names,
/// face areas). Diagnostics are passed through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub verified: bool,
    #[serde(flatten)]
    pub diagnostics: Map<String, Value>,
}

impl VerificationOutcome {
    pub fn new(verified: bool) -> Self {
        Self {
            verified,
            diagnostics: Map::new(),
        }
    }

    pub fn with_diagnostic(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.diagnostics.insert(key.to_string(), value.into());
        self
    }
}
