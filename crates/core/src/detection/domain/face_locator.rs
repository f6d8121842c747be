use crate::shared::frame::Frame;

use super::detection::Detection;

/// Domain interface for locating faces in a single frame.
///
/// Implementations may hold mutable state (HTTP payload files, classifier
/// buffers), hence `&mut self`. An empty vector means "no faces found";
/// an error means the provider could not answer at all.
pub trait FaceLocator: Send {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;

    /// Short provider name used in log lines.
    fn name(&self) -> &str;
}
