use std::path::Path;

use ndarray::ArrayView3;

/// A decoded still image: contiguous RGB bytes in row-major order.
///
/// `index` is the position of the frame in its source video (0 for
/// standalone images).
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 3,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// Loads an image file, sniffing the format from its content rather
    /// than trusting the extension.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?
            .to_rgb8();
        let (width, height) = img.dimensions();
        Ok(Self::new(img.into_raw(), width, height, 0))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, 3),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }

    /// Copies out the `width` x `height` rectangle at (`x`, `y`), clamped
    /// to the frame bounds. The result is at least 1x1.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Frame {
        let x0 = x.min(self.width.saturating_sub(1));
        let y0 = y.min(self.height.saturating_sub(1));
        let w = width.clamp(1, self.width - x0);
        let h = height.clamp(1, self.height - y0);

        let stride = self.width as usize * 3;
        let mut data = Vec::with_capacity(w as usize * h as usize * 3);
        for row in y0..y0 + h {
            let start = row as usize * stride + x0 as usize * 3;
            data.extend_from_slice(&self.data[start..start + w as usize * 3]);
        }
        Frame::new(data, w, h, self.index)
    }
}
