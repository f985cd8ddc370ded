use crate::shared::frame::Frame;

/// Maps a face crop to an L2-normalized identity embedding.
pub trait FaceEmbedder: Send {
    fn embed(&mut self, face: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error>>;

    /// Short name reported in verification diagnostics.
    fn name(&self) -> &str;
}
