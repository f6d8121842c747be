use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crossbeam_channel::Receiver;

use facetips_core::detection::domain::detection::Predictions;
use facetips_core::detection::infrastructure::fallback_locator::FallbackLocator;
use facetips_core::shared::frame::Frame;

pub enum DetectionMessage {
    Detections(Predictions),
    /// Hands the locator back so the next frame can reuse it.
    Complete(FallbackLocator),
}

/// Locates faces in `frame` on a background thread.
///
/// A panicking provider counts as "no faces"; the locator is still handed back.
pub fn spawn(mut locator: FallbackLocator, frame: Frame) -> Receiver<DetectionMessage> {
    let (tx, rx) = crossbeam_channel::unbounded::<DetectionMessage>();

    thread::spawn(move || {
        let predictions = panic::catch_unwind(AssertUnwindSafe(|| {
            locator.locate_predictions(&frame)
        }))
        .unwrap_or_else(|_| {
            log::error!("Face locator panicked on frame {}", frame.index());
            Predictions::default()
        });
        log::debug!(
            "frame {}: {} face(s)",
            frame.index(),
            predictions.predictions.len()
        );
        let _ = tx.send(DetectionMessage::Detections(predictions));
        let _ = tx.send(DetectionMessage::Complete(locator));
    });

    rx
}
