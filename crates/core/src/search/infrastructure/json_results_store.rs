use std::fs;
use std::path::{Path, PathBuf};

use crate::search::domain::results_store::ResultsStore;
use crate::search::domain::search_result::SearchResult;

/// Writes results as a pretty-printed JSON array, replacing the file.
pub struct JsonResultsStore {
    path: PathBuf,
}

impl JsonResultsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<SearchResult>, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl ResultsStore for JsonResultsStore {
    fn save(&self, results: &[SearchResult]) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(results)?;
        fs::write(&self.path, json)?;
        log::debug!("saved {} result(s) to {}", results.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(host: &str, snippet: &str) -> SearchResult {
        SearchResult::for_page(&format!("https://{host}/p"), snippet.to_string())
    }

    #[test]
    fn test_save_then_load_preserves_results() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonResultsStore::new(dir.path().join("search_results.json"));
        let results = vec![result("a.example", "Name: A"), result("b.example", "Name: B")];

        store.save(&results).unwrap();

        assert_eq!(store.load().unwrap(), results);
    }

    #[test]
    fn test_save_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonResultsStore::new(dir.path().join("search_results.json"));
        store
            .save(&[result("a.example", "x"), result("b.example", "y")])
            .unwrap();

        store.save(&[result("c.example", "z")]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "c.example");
    }

    #[test]
    fn test_file_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonResultsStore::new(dir.path().join("out.json"));
        store.save(&[result("a.example", "s")]).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n  {"), "{text}");
        assert!(text.contains("\"title\": \"a.example\""));
    }

    #[test]
    fn test_save_creates_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonResultsStore::new(dir.path().join("nested/out.json"));
        store.save(&[]).unwrap();
        assert_eq!(store.load().unwrap(), vec![]);
    }
}
