pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const ARCFACE_MODEL_NAME: &str = "w600k_r50.onnx";
pub const ARCFACE_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

/// Keep every Nth decoded frame.
pub const DEFAULT_SAMPLE_INTERVAL: usize = 10;

/// Cosine distance at or below which two faces are the same person (ArcFace).
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.68;

pub const MATCH_MESSAGE: &str = "Face in image matches a face in video";
pub const NO_MATCH_MESSAGE: &str = "No match found";
pub const NO_FRAMES_MESSAGE: &str = "No frames extracted from video";

pub const FRAME_FILE_PREFIX: &str = "frame_";
pub const FRAME_FILE_SUFFIX: &str = ".jpg";
pub const DOWNLOAD_FILE_PREFIX: &str = "input_";
