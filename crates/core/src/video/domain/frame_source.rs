use crate::shared::frame::Frame;

/// Produces frames from a live device, one per call.
pub trait FrameSource {
    /// Returns the next frame, or `None` once the device stops delivering.
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    fn name(&self) -> String;
}
