use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::imageops;
use rustface::{Detector, FaceInfo, ImageData};
use thiserror::Error;

use crate::detection::domain::detection::Detection;
use crate::detection::domain::face_locator::FaceLocator;
use crate::shared::constants::LOCAL_DETECTION_CONFIDENCE;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("failed to read classifier model {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid classifier model: {0}")]
    Model(#[source] std::io::Error),
}

const MIN_FACE_SIZE: u32 = 40;
const SCORE_THRESHOLD: f64 = 2.0;
const PYRAMID_SCALE_FACTOR: f32 = 0.8;
const WINDOW_STEP: u32 = 4;

/// Local frontal-face classifier (SeetaFace cascade) over grayscale frames.
///
/// The parsed detector is not `Send`, so only the raw model bytes are kept
/// and a detector is built per call on the thread doing the work.
pub struct CascadeLocator {
    model: Vec<u8>,
}

impl CascadeLocator {
    pub fn from_file(path: &Path) -> Result<Self, CascadeError> {
        let model = fs::read(path).map_err(|source| CascadeError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(model)
    }

    /// Validates the model once so a corrupt file fails at startup.
    pub fn from_bytes(model: Vec<u8>) -> Result<Self, CascadeError> {
        rustface::read_model(Cursor::new(&model)).map_err(CascadeError::Model)?;
        Ok(Self { model })
    }

    fn build_detector(&self) -> Result<Box<dyn Detector>, CascadeError> {
        let model = rustface::read_model(Cursor::new(&self.model)).map_err(CascadeError::Model)?;
        let mut detector = rustface::create_detector_with_model(model);
        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_score_thresh(SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor(PYRAMID_SCALE_FACTOR);
        detector.set_slide_window_step(WINDOW_STEP, WINDOW_STEP);
        Ok(detector)
    }
}

impl FaceLocator for CascadeLocator {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let gray = imageops::grayscale(&frame.to_rgb_image());
        let (width, height) = gray.dimensions();

        let mut detector = self.build_detector()?;
        let faces = detector.detect(&ImageData::new(gray.as_raw(), width, height));

        Ok(faces.iter().map(to_detection).collect())
    }

    fn name(&self) -> &str {
        "cascade"
    }
}

fn to_detection(face: &FaceInfo) -> Detection {
    let bbox = face.bbox();
    corner_to_detection(bbox.x(), bbox.y(), bbox.width(), bbox.height())
}

/// Converts a top-left corner box into a center-form detection with the
/// fixed local confidence.
fn corner_to_detection(x: i32, y: i32, width: u32, height: u32) -> Detection {
    let (w, h) = (width as f64, height as f64);
    Detection::new(
        x as f64 + w / 2.0,
        y as f64 + h / 2.0,
        w,
        h,
        Some(LOCAL_DETECTION_CONFIDENCE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_corner_box_becomes_center_form() {
        let d = corner_to_detection(40, 60, 100, 80);
        assert_relative_eq!(d.x, 90.0);
        assert_relative_eq!(d.y, 100.0);
        assert_relative_eq!(d.width, 100.0);
        assert_relative_eq!(d.height, 80.0);
    }

    #[test]
    fn test_every_local_detection_gets_fixed_confidence() {
        let d = corner_to_detection(0, 0, 10, 10);
        assert_eq!(d.confidence, Some(LOCAL_DETECTION_CONFIDENCE));
    }

    #[test]
    fn test_from_file_missing_model_is_error() {
        let result = CascadeLocator::from_file(Path::new("/nonexistent/seeta.bin"));
        assert!(matches!(result, Err(CascadeError::Read { .. })));
    }

    #[test]
    fn test_from_bytes_rejects_garbage_model() {
        // too short to hold even the classifier count
        let result = CascadeLocator::from_bytes(vec![1u8, 2]);
        assert!(matches!(result, Err(CascadeError::Model(_))));
    }
}
