use serde::{Deserialize, Serialize};

use crate::shared::region::FaceRegion;

/// One located face in center-coordinate form.
///
/// Field names follow the hosted inference JSON so provider responses
/// deserialize directly; unknown provider fields are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Detection {
    pub fn new(x: f64, y: f64, width: f64, height: f64, confidence: Option<f64>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence,
        }
        .sanitized()
    }

    /// Clamps negative (or NaN) sizes reported by a provider to zero.
    pub fn sanitized(mut self) -> Self {
        self.width = non_negative(self.width);
        self.height = non_negative(self.height);
        self
    }

    /// Frame-clamped corner box around this detection, grown by `margin`.
    pub fn region(&self, margin: i32, frame_w: u32, frame_h: u32) -> FaceRegion {
        FaceRegion::around_center(
            (self.x, self.y),
            (self.width, self.height),
            margin,
            frame_w,
            frame_h,
        )
    }
}

fn non_negative(v: f64) -> f64 {
    if v > 0.0 {
        v
    } else {
        0.0
    }
}

/// The face locator's output envelope: `{"predictions": [...]}`.
///
/// Ordering is provider-defined; the first entry is the active face.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Predictions {
    pub predictions: Vec<Detection>,
}

impl Predictions {
    pub fn new(predictions: Vec<Detection>) -> Self {
        Self {
            predictions: predictions.into_iter().map(Detection::sanitized).collect(),
        }
    }

    pub fn primary(&self) -> Option<&Detection> {
        self.predictions.first()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}
