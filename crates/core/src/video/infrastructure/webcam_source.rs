use image::imageops::{self, FilterType};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use thiserror::Error;

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

#[derive(Error, Debug)]
pub enum WebcamError {
    #[error("failed to open camera {index}: {source}")]
    Open {
        index: u32,
        #[source]
        source: nokhwa::NokhwaError,
    },
    #[error("failed to capture frame: {0}")]
    Capture(#[source] nokhwa::NokhwaError),
}

/// Live camera wrapped as a [`FrameSource`].
///
/// Every frame is resized to the configured output dimensions so the rest
/// of the application can rely on a fixed frame size.
pub struct WebcamSource {
    camera: Camera,
    width: u32,
    height: u32,
    next_index: usize,
}

impl WebcamSource {
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self, WebcamError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|source| WebcamError::Open { index, source })?;
        camera
            .open_stream()
            .map_err(|source| WebcamError::Open { index, source })?;

        log::info!(
            "Opened camera {} ({})",
            camera.info().human_name(),
            camera.camera_format()
        );

        Ok(Self {
            camera,
            width,
            height,
            next_index: 0,
        })
    }
}

impl FrameSource for WebcamSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let buffer = self.camera.frame().map_err(WebcamError::Capture)?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(WebcamError::Capture)?;

        // Rebuild through raw bytes so the camera crate's `image` version
        // does not leak into ours.
        let (w, h) = decoded.dimensions();
        let decoded = RgbImage::from_raw(w, h, decoded.into_raw())
            .ok_or("camera delivered a truncated frame")?;

        let image = if (w, h) == (self.width, self.height) {
            decoded
        } else {
            imageops::resize(&decoded, self.width, self.height, FilterType::Triangle)
        };

        let frame = Frame::from_rgb_image(image, self.next_index);
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn name(&self) -> String {
        self.camera.info().human_name()
    }
}

impl Drop for WebcamSource {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            log::debug!("Failed to stop camera stream: {e}");
        }
    }
}
