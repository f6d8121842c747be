/// Finds web pages that show an image similar to the one at `image_url`.
///
/// Implementations return de-duplicated page URLs, best match first.
pub trait ReverseImageSearch: Send + Sync {
    fn find_pages(&self, image_url: &str) -> Result<Vec<String>, Box<dyn std::error::Error>>;
}
