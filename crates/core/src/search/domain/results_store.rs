use super::search_result::SearchResult;

/// Persists the outcome of the latest search, replacing the previous one.
pub trait ResultsStore: Send + Sync {
    fn save(&self, results: &[SearchResult]) -> Result<(), Box<dyn std::error::Error>>;
}
