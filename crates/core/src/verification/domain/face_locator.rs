use crate::shared::frame::Frame;
use crate::verification::domain::face_box::FaceBox;

/// Finds faces in a still image, best candidates first.
pub trait FaceLocator: Send {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>>;

    /// Short name reported in verification diagnostics.
    fn name(&self) -> &str;
}
