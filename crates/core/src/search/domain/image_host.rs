/// Publishes an encoded image and returns a URL anyone can fetch.
pub trait ImageHost: Send + Sync {
    fn upload(&self, jpeg: &[u8]) -> Result<String, Box<dyn std::error::Error>>;
}
