use std::path::Path;
use std::time::Instant;

use serde_json::json;

use crate::shared::constants::DEFAULT_DISTANCE_THRESHOLD;
use crate::shared::frame::Frame;
use crate::verification::domain::face_box::FaceBox;
use crate::verification::domain::face_embedder::FaceEmbedder;
use crate::verification::domain::face_locator::FaceLocator;
use crate::verification::domain::face_verifier::FaceVerifier;
use crate::verification::domain::verification_outcome::VerificationOutcome;

/// Verifies a pair by cosine distance between the embeddings of the most
/// confident face in each image.
///
/// With `enforce_detection` off (the default), an image without a
/// detectable face is embedded whole instead of failing, so the verifier
/// always returns a judgment for readable images.
pub struct EmbeddingFaceVerifier {
    locator: Box<dyn FaceLocator>,
    embedder: Box<dyn FaceEmbedder>,
    threshold: f64,
    enforce_detection: bool,
}

impl EmbeddingFaceVerifier {
    pub fn new(locator: Box<dyn FaceLocator>, embedder: Box<dyn FaceEmbedder>) -> Self {
        Self {
            locator,
            embedder,
            threshold: DEFAULT_DISTANCE_THRESHOLD,
            enforce_detection: false,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_enforce_detection(mut self, enforce: bool) -> Self {
        self.enforce_detection = enforce;
        self
    }

    fn represent(
        &mut self,
        path: &Path,
    ) -> Result<(Vec<f32>, FaceBox), Box<dyn std::error::Error>> {
        let image = Frame::load(path)?;
        let face = match self.locator.locate(&image)?.into_iter().next() {
            Some(face) => face,
            None if self.enforce_detection => {
                return Err(format!("Face could not be detected in {}", path.display()).into());
            }
            None => FaceBox::whole_image(image.width(), image.height()),
        };
        let crop = image.crop(face.x, face.y, face.width, face.height);
        let embedding = self.embedder.embed(&crop)?;
        Ok((embedding, face))
    }
}

impl FaceVerifier for EmbeddingFaceVerifier {
    fn verify(
        &mut self,
        reference: &Path,
        candidate: &Path,
    ) -> Result<VerificationOutcome, Box<dyn std::error::Error>> {
        let started = Instant::now();
        let (reference_embedding, reference_face) = self.represent(reference)?;
        let (candidate_embedding, candidate_face) = self.represent(candidate)?;

        let distance = cosine_distance(&reference_embedding, &candidate_embedding)?;
        let verified = distance <= self.threshold;

        Ok(VerificationOutcome::new(verified)
            .with_diagnostic("distance", distance)
            .with_diagnostic("threshold", self.threshold)
            .with_diagnostic("model", self.embedder.name())
            .with_diagnostic("detector_backend", self.locator.name())
            .with_diagnostic("similarity_metric", "cosine")
            .with_diagnostic(
                "facial_areas",
                json!({
                    "img1": reference_face.to_json(),
                    "img2": candidate_face.to_json(),
                }),
            )
            .with_diagnostic("time", round_secs(started.elapsed().as_secs_f64())))
    }
}

/// `1 - cos(a, b)` for L2-normalized vectors: 0 for identical directions,
/// 2 for opposite ones.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f64, String> {
    if a.len() != b.len() || a.is_empty() {
        return Err(format!(
            "Embedding size mismatch: {} vs {}",
            a.len(),
            b.len()
        ));
    }
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    Ok(1.0 - dot)
}

fn round_secs(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}
