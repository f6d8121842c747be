use crate::detection::domain::detection::{Detection, Predictions};
use crate::detection::domain::face_locator::FaceLocator;
use crate::shared::frame::Frame;

/// Ranked chain of face locators: the first provider returning a
/// non-empty result wins.
///
/// Errors and empty answers move on to the next provider. When every
/// provider is exhausted the chain reports no faces rather than failing.
pub struct FallbackLocator {
    providers: Vec<Box<dyn FaceLocator>>,
}

impl FallbackLocator {
    pub fn new(providers: Vec<Box<dyn FaceLocator>>) -> Self {
        Self { providers }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Runs the chain and always returns the `{predictions: [...]}` shape.
    pub fn locate_predictions(&mut self, frame: &Frame) -> Predictions {
        for provider in self.providers.iter_mut() {
            match provider.locate(frame) {
                Ok(found) if !found.is_empty() => return Predictions::new(found),
                Ok(_) => log::debug!("{}: no faces, trying next locator", provider.name()),
                Err(e) => log::warn!("{} locator failed: {e}", provider.name()),
            }
        }
        Predictions::default()
    }
}

impl FaceLocator for FallbackLocator {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        Ok(self.locate_predictions(frame).predictions)
    }

    fn name(&self) -> &str {
        "fallback"
    }
}
