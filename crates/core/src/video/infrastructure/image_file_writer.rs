use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;

use crate::shared::constants::PAYLOAD_JPEG_QUALITY;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Encodes frames as JPEG using the `image` crate.
pub struct ImageFileWriter {
    quality: u8,
}

impl ImageFileWriter {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new(PAYLOAD_JPEG_QUALITY)
    }
}

impl ImageWriter for ImageFileWriter {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err("cannot encode an empty frame".into());
        }
        let img = frame.to_rgb_image();
        let mut buf = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut buf, self.quality).encode_image(&img)?;
        Ok(buf.into_inner())
    }

    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        // Ensure parent directory exists (infrastructure concern)
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = self.encode(frame)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, r: u8, g: u8, b: u8) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            data.push(r);
            data.push(g);
            data.push(b);
        }
        Frame::new(data, width, height, 0)
    }

    #[test]
    fn test_encode_produces_jpeg_magic() {
        let frame = make_frame(32, 24, 50, 100, 200);
        let bytes = ImageFileWriter::default().encode(&frame).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_write_creates_decodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.jpg");
        let frame = make_frame(40, 30, 120, 120, 120);
        ImageFileWriter::default().write(&path, &frame).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (40, 30));
        let px = img.get_pixel(10, 10).0;
        // JPEG is lossy; a flat grey survives within a few levels
        assert!(px.iter().all(|&c| (115..=125).contains(&c)), "{px:?}");
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.jpg");
        std::fs::write(&path, b"stale").unwrap();
        ImageFileWriter::default()
            .write(&path, &make_frame(8, 8, 0, 0, 0))
            .unwrap();
        assert_ne!(std::fs::read(&path).unwrap(), b"stale");
    }

    #[test]
    fn test_encode_empty_frame_is_error() {
        let frame = Frame::new(Vec::new(), 0, 0, 0);
        assert!(ImageFileWriter::default().encode(&frame).is_err());
    }

    #[test]
    fn test_write_invalid_path_returns_error() {
        let frame = make_frame(10, 10, 0, 0, 0);
        assert!(ImageFileWriter::default()
            .write(Path::new("/nonexistent/dir/\0/out.jpg"), &frame)
            .is_err());
    }
}
