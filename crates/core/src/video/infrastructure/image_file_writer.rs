use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes frames with the `image` crate; the encoder is picked from the
/// path's extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        img.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let data = rgb.repeat((width * height) as usize);
        Frame::new(data, width, height, 0)
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        let writer = ImageFileWriter::new();
        writer.write(&path, &make_frame(100, 80, [50, 100, 200])).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_png_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let writer = ImageFileWriter::new();
        writer.write(&path, &make_frame(50, 50, [50, 100, 200])).unwrap();

        let loaded = Frame::load(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (50, 50));
        assert_eq!(&loaded.data()[..3], &[50, 100, 200]);
    }

    #[test]
    fn test_write_overwrites_existing_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        std::fs::write(&path, b"").unwrap();

        ImageFileWriter::new()
            .write(&path, &make_frame(16, 16, [0, 0, 0]))
            .unwrap();
        assert!(Frame::load(&path).is_ok());
    }

    #[test]
    fn test_write_invalid_path_returns_error() {
        let writer = ImageFileWriter::new();
        assert!(writer
            .write(Path::new("/nonexistent/dir/frame.jpg"), &make_frame(10, 10, [0, 0, 0]))
            .is_err());
    }
}
