use serde::Deserialize;

/// A video and a reference image to compare, each a local path or an
/// `http`/`https` URL.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ComparisonRequest {
    #[serde(rename = "video_path")]
    pub video: String,
    #[serde(rename = "image_path")]
    pub image: String,
}

impl ComparisonRequest {
    pub fn new(video: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            video: video.into(),
            image: image.into(),
        }
    }
}
