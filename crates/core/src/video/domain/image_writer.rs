use std::path::Path;

use crate::shared::frame::Frame;

/// Encodes frames as compressed images, in memory or on disk.
pub trait ImageWriter: Send + Sync {
    /// Encodes a frame into an in-memory image file.
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Encodes a frame and writes it to `path`, replacing any existing file.
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let bytes = self.encode(frame)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
