pub mod embedding_face_verifier;
pub mod model_resolver;
mod onnx_session;
pub mod onnx_arcface_embedder;
pub mod onnx_yolo_face_locator;
