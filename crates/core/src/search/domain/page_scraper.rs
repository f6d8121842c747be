/// Fetches a page and reduces it to its visible text.
pub trait PageScraper: Send + Sync {
    fn scrape(&self, url: &str) -> Result<String, Box<dyn std::error::Error>>;
}
