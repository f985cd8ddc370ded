/// YOLO face locator using ONNX Runtime via `ort`.
///
/// Letterbox preprocessing, a single inference pass, confidence filtering
/// and greedy NMS. Boxes come back in source-image pixels, most confident
/// first.
use std::path::Path;

use crate::shared::frame::Frame;
use crate::verification::domain::face_box::FaceBox;
use crate::verification::domain::face_locator::FaceLocator;

use super::onnx_session::{build_session, require_outputs, square_input_size};

/// Fallback model input resolution when the model doesn't declare one.
const DEFAULT_INPUT_SIZE: usize = 640;

pub const DEFAULT_CONFIDENCE: f64 = 0.25;

const NMS_IOU_THRESH: f64 = 0.45;

pub struct OnnxYoloFaceLocator {
    session: ort::session::Session,
    confidence: f64,
    input_size: usize,
}

impl OnnxYoloFaceLocator {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = build_session(model_path)?;
        let input_size = square_input_size(&session).unwrap_or(DEFAULT_INPUT_SIZE);
        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

impl FaceLocator for OnnxYoloFaceLocator {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
        let (input_tensor, placement) = letterbox(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        require_outputs(outputs.len(), "YOLO")?;
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        if shape.len() != 3 {
            return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
        }
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;

        let mut candidates = parse_detections(data, shape[1], shape[2], self.confidence);
        let kept = nms(&mut candidates, NMS_IOU_THRESH);

        Ok(kept
            .iter()
            .filter_map(|d| {
                let [x1, y1, x2, y2] = placement.unmap(&d.bbox);
                FaceBox::from_corners(x1, y1, x2, y2, frame.width(), frame.height(), d.confidence)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "yolo11n-face"
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Placement of the source image inside the square model input.
#[derive(Clone, Copy, Debug)]
struct Letterbox {
    scale: f64,
    pad_x: f64,
    pad_y: f64,
}

impl Letterbox {
    /// Maps an `[x1, y1, x2, y2]` box from model-input to source pixels.
    fn unmap(&self, bbox: &[f64; 4]) -> [f64; 4] {
        [
            (bbox[0] - self.pad_x) / self.scale,
            (bbox[1] - self.pad_y) / self.scale,
            (bbox[2] - self.pad_x) / self.scale,
            (bbox[3] - self.pad_y) / self.scale,
        ]
    }
}

/// Aspect-preserving nearest-neighbor resize onto a gray square canvas,
/// normalized to 0..1, NCHW.
fn letterbox(frame: &Frame, target_size: usize) -> (ndarray::Array4<f32>, Letterbox) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as usize).min(target_size);
    let new_h = ((fh * scale).round() as usize).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    let gray = 114.0f32 / 255.0;
    let mut tensor = ndarray::Array4::<f32>::from_elem((1, 3, target_size, target_size), gray);

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    for y in 0..new_h {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, pad_y + y, pad_x + x]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    (
        tensor,
        Letterbox {
            scale,
            pad_x: pad_x as f64,
            pad_y: pad_y as f64,
        },
    )
}

// ---------------------------------------------------------------------------
// Postprocessing
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct Candidate {
    /// `[x1, y1, x2, y2]` in model-input pixels.
    bbox: [f64; 4],
    confidence: f64,
}

/// Reads rows of `[cx, cy, w, h, conf, ...]` from a YOLO output tensor.
///
/// The output is either `[1, features, detections]` (transposed, the
/// usual export) or `[1, detections, features]`; the smaller axis is taken
/// to be the feature axis.
fn parse_detections(data: &[f32], dim1: usize, dim2: usize, min_confidence: f64) -> Vec<Candidate> {
    let transposed = dim1 < dim2;
    let (num_dets, num_feats) = if transposed { (dim2, dim1) } else { (dim1, dim2) };
    if num_feats < 5 {
        return Vec::new();
    }

    let feature = |det: usize, f: usize| -> f64 {
        if transposed {
            data[f * num_dets + det] as f64
        } else {
            data[det * num_feats + f] as f64
        }
    };

    (0..num_dets)
        .filter_map(|i| {
            let conf = feature(i, 4);
            if conf < min_confidence {
                return None;
            }
            let (cx, cy, w, h) = (feature(i, 0), feature(i, 1), feature(i, 2), feature(i, 3));
            Some(Candidate {
                bbox: [cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0],
                confidence: conf,
            })
        })
        .collect()
}

/// Greedy NMS: sort by confidence descending, suppress overlapping boxes.
fn nms(candidates: &mut [Candidate], iou_thresh: f64) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<Candidate> = Vec::new();
    for c in candidates.iter() {
        if keep.iter().all(|k| bbox_iou(&k.bbox, &c.bbox) <= iou_thresh) {
            keep.push(c.clone());
        }
    }
    keep
}

fn bbox_iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}
