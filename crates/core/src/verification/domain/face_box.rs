use serde_json::{json, Value};

/// Axis-aligned face rectangle in pixel coordinates of its source image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Detector score; 0.0 when the box is a whole-image fallback.
    pub confidence: f64,
}

impl FaceBox {
    /// The entire image, used when no face was found and detection is not
    /// enforced.
    pub fn whole_image(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            confidence: 0.0,
        }
    }

    /// Builds a box from corner coordinates, clamped to the image. Returns
    /// `None` when nothing of the box lies inside the image.
    pub fn from_corners(
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        image_width: u32,
        image_height: u32,
        confidence: f64,
    ) -> Option<Self> {
        let left = x1.max(0.0).floor();
        let top = y1.max(0.0).floor();
        let right = x2.min(image_width as f64).ceil();
        let bottom = y2.min(image_height as f64).ceil();
        if right - left < 1.0 || bottom - top < 1.0 {
            return None;
        }
        Some(Self {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
            confidence,
        })
    }

    pub fn to_json(&self) -> Value {
        json!({
            "x": self.x,
            "y": self.y,
            "w": self.width,
            "h": self.height,
            "confidence": self.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_clamps_to_image() {
        let b = FaceBox::from_corners(-10.0, -5.0, 50.4, 300.0, 100, 200, 0.9).unwrap();
        assert_eq!((b.x, b.y, b.width, b.height), (0, 0, 51, 200));
    }

    #[test]
    fn test_from_corners_outside_image() {
        assert!(FaceBox::from_corners(150.0, 10.0, 180.0, 40.0, 100, 100, 0.9).is_none());
    }

    #[test]
    fn test_from_corners_degenerate() {
        assert!(FaceBox::from_corners(10.0, 10.0, 10.0, 50.0, 100, 100, 0.9).is_none());
    }

    #[test]
    fn test_whole_image() {
        let b = FaceBox::whole_image(640, 480);
        assert_eq!((b.x, b.y, b.width, b.height), (0, 0, 640, 480));
        assert_eq!(b.confidence, 0.0);
    }

    #[test]
    fn test_to_json_field_names() {
        let b = FaceBox {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
            confidence: 0.5,
        };
        assert_eq!(
            b.to_json(),
            json!({"x": 1, "y": 2, "w": 3, "h": 4, "confidence": 0.5})
        );
    }
}
