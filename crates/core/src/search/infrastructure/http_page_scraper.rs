use std::time::Duration;

use scraper::{Html, Node};
use thiserror::Error;

use crate::search::domain::page_scraper::PageScraper;
use crate::shared::constants::{BROWSER_USER_AGENT, SCRAPE_MAX_CHARS, SCRAPE_TIMEOUT_SECS};

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("page request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("page returned HTTP {0}")]
    Status(u16),
}

const HIDDEN_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// Fetches pages with a desktop browser User-Agent and keeps their text.
pub struct HttpPageScraper {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl Default for HttpPageScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpPageScraper {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            timeout: Duration::from_secs(SCRAPE_TIMEOUT_SECS),
        }
    }

    fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .timeout(self.timeout)
            .send()?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(ScrapeError::Status(response.status().as_u16()));
        }
        Ok(response.text()?)
    }
}

impl PageScraper for HttpPageScraper {
    fn scrape(&self, url: &str) -> Result<String, Box<dyn std::error::Error>> {
        let html = self.fetch(url)?;
        let text = extract_visible_text(&html);
        log::debug!("scraped {} chars from {url}", text.chars().count());
        Ok(text)
    }
}

/// Visible text of an HTML document: script/style/noscript bodies dropped,
/// whitespace collapsed to single spaces, cut to [`SCRAPE_MAX_CHARS`].
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut words: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| match a.value() {
            Node::Element(e) => HIDDEN_TAGS.contains(&e.name()),
            _ => false,
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ").chars().take(SCRAPE_MAX_CHARS).collect()
}
