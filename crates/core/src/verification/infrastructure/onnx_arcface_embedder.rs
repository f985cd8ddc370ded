/// ArcFace identity embeddings using ONNX Runtime.
use std::path::Path;

use crate::shared::frame::Frame;
use crate::verification::domain::face_embedder::FaceEmbedder;

use super::onnx_session::{build_session, require_outputs, square_input_size};

const DEFAULT_INPUT_SIZE: usize = 112;
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

pub struct OnnxArcFaceEmbedder {
    session: ort::session::Session,
    input_size: usize,
}

impl OnnxArcFaceEmbedder {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = build_session(model_path)?;
        let input_size = square_input_size(&session).unwrap_or(DEFAULT_INPUT_SIZE);
        Ok(Self {
            session,
            input_size,
        })
    }
}

impl FaceEmbedder for OnnxArcFaceEmbedder {
    fn embed(&mut self, face: &Frame) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        let tensor = preprocess(face, self.input_size);
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        require_outputs(outputs.len(), "ArcFace")?;
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let mut embedding = embedding_array
            .as_slice()
            .ok_or("Cannot get embedding slice")?
            .to_vec();
        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn name(&self) -> &str {
        "ArcFace"
    }
}

/// Nearest-neighbor resize to `size` x `size`, `(x - 127.5) / 127.5`, NCHW.
fn preprocess(face: &Frame, size: usize) -> ndarray::Array4<f32> {
    let src_w = face.width() as usize;
    let src_h = face.height() as usize;
    let src = face.as_ndarray();

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, size, size));
    for y in 0..size {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / size as f64) as usize).min(src_h - 1);
        for x in 0..size {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / size as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = (src[[src_y, src_x, c]] as f32 - NORM_MEAN) / NORM_STD;
            }
        }
    }
    tensor
}

pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
