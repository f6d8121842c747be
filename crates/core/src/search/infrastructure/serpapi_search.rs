use serde_json::Value;
use thiserror::Error;

use crate::search::domain::reverse_image_search::ReverseImageSearch;
use crate::shared::constants::{MAX_CANDIDATE_PAGES, SERPAPI_URL};

#[derive(Error, Debug)]
pub enum ReverseSearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("search service returned HTTP {0}")]
    Status(u16),
    #[error("search service error: {0}")]
    Api(String),
}

/// Result sections scanned for page links, with the field holding the link.
const LINK_SECTIONS: [(&str, &str); 5] = [
    ("image_results", "link"),
    ("inline_images", "source"),
    ("visual_matches", "link"),
    ("pages_with_matching_images", "url"),
    ("organic_results", "link"),
];

/// Google reverse-image search through SerpAPI.
pub struct SerpApiSearch {
    client: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
}

impl SerpApiSearch {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_url: SERPAPI_URL.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    fn query(&self, image_url: &str) -> Result<Value, ReverseSearchError> {
        let response = self
            .client
            .get(format!("{}/search.json", self.api_url))
            .query(&[
                ("engine", "google_reverse_image"),
                ("image_url", image_url),
                ("api_key", self.api_key.as_str()),
                ("location", "United States"),
                ("hl", "en"),
                ("gl", "us"),
            ])
            .send()?;

        if !response.status().is_success() {
            return Err(ReverseSearchError::Status(response.status().as_u16()));
        }
        let body: Value = response.json()?;
        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(ReverseSearchError::Api(message.to_string()));
        }
        Ok(body)
    }
}

impl ReverseImageSearch for SerpApiSearch {
    fn find_pages(&self, image_url: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        let body = self.query(image_url)?;
        let urls = extract_candidate_urls(&body);
        log::debug!("reverse search returned {} candidate page(s)", urls.len());
        Ok(urls)
    }
}

/// Collects page links across the known sections in order, keeping the
/// first occurrence of each and at most [`MAX_CANDIDATE_PAGES`].
pub fn extract_candidate_urls(body: &Value) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for (section, key) in LINK_SECTIONS {
        let Some(items) = body.get(section).and_then(Value::as_array) else {
            continue;
        };
        for link in items.iter().filter_map(|item| item.get(key)?.as_str()) {
            if !link.is_empty() && !urls.iter().any(|u| u == link) {
                urls.push(link.to_string());
            }
        }
    }
    urls.truncate(MAX_CANDIDATE_PAGES);
    urls
}
