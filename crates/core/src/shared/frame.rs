use image::RgbImage;

use super::region::FaceRegion;

/// A single camera frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the domain layer
/// treats pixel data as opaque.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

const CHANNELS: usize = 3;

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn from_rgb_image(image: RgbImage, index: usize) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, index)
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

    /// Copies the pixels into an `image` buffer for encoding or drawing.
    pub fn to_rgb_image(&self) -> RgbImage {
        // Length is checked on construction, so this cannot fail.
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    pub fn into_rgb_image(self) -> RgbImage {
        let (width, height) = (self.width, self.height);
        RgbImage::from_raw(width, height, self.data).unwrap_or_else(|| RgbImage::new(width, height))
    }

    /// Extracts the pixels inside `region` (end coordinates exclusive).
    pub fn crop(&self, region: &FaceRegion) -> Frame {
        let x1 = (region.x1.max(0) as u32).min(self.width);
        let y1 = (region.y1.max(0) as u32).min(self.height);
        let x2 = (region.x2.max(0) as u32).clamp(x1, self.width);
        let y2 = (region.y2.max(0) as u32).clamp(y1, self.height);
        let (w, h) = (x2 - x1, y2 - y1);

        let stride = self.width as usize * CHANNELS;
        let mut data = Vec::with_capacity(w as usize * h as usize * CHANNELS);
        for row in y1..y2 {
            let start = row as usize * stride + x1 as usize * CHANNELS;
            data.extend_from_slice(&self.data[start..start + w as usize * CHANNELS]);
        }
        Frame::new(data, w, h, self.index)
    }
}
