use crate::search::domain::image_host::ImageHost;
use crate::search::domain::page_scraper::PageScraper;
use crate::search::domain::results_store::ResultsStore;
use crate::search::domain::reverse_image_search::ReverseImageSearch;
use crate::search::domain::search_result::{page_title, SearchResult};
use crate::search::domain::tip_summarizer::{TipSummarizer, FALLBACK_SNIPPET};
use crate::shared::constants::MIN_SUMMARY_INPUT_CHARS;
use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

pub const STATUS_UPLOADING: &str = "Uploading and searching...";
pub const STATUS_UPLOAD_FAILED: &str = "Failed to upload image.";
pub const STATUS_NO_PAGES: &str = "No websites found";
pub const STATUS_COMPLETE: &str = "Search complete";
pub const STATUS_NOTHING_USEFUL: &str = "No useful information found";

/// Face crop → hosted image → reverse search → page text → tips.
///
/// Every stage degrades instead of failing: the caller only ever sees a
/// (possibly empty) result list and the status lines reported on the way.
pub struct IdentifyFaceUseCase {
    image_writer: Box<dyn ImageWriter>,
    image_host: Box<dyn ImageHost>,
    search: Box<dyn ReverseImageSearch>,
    scraper: Box<dyn PageScraper>,
    summarizer: Box<dyn TipSummarizer>,
    store: Box<dyn ResultsStore>,
}

impl IdentifyFaceUseCase {
    pub fn new(
        image_writer: Box<dyn ImageWriter>,
        image_host: Box<dyn ImageHost>,
        search: Box<dyn ReverseImageSearch>,
        scraper: Box<dyn PageScraper>,
        summarizer: Box<dyn TipSummarizer>,
        store: Box<dyn ResultsStore>,
    ) -> Self {
        Self {
            image_writer,
            image_host,
            search,
            scraper,
            summarizer,
            store,
        }
    }

    pub fn execute(&self, face: &Frame, on_status: &dyn Fn(&str)) -> Vec<SearchResult> {
        on_status(STATUS_UPLOADING);

        let Some(image_url) = self.upload(face) else {
            on_status(STATUS_UPLOAD_FAILED);
            return Vec::new();
        };

        let pages = self.search.find_pages(&image_url).unwrap_or_else(|e| {
            log::warn!("Reverse image search failed: {e}");
            Vec::new()
        });
        if pages.is_empty() {
            on_status(STATUS_NO_PAGES);
            return Vec::new();
        }
        on_status(&format!("Found {} pages", pages.len()));

        let total = pages.len();
        let mut results = Vec::with_capacity(total);
        for (i, link) in pages.iter().enumerate() {
            on_status(&format!("Reading {} ({}/{})", page_title(link), i + 1, total));
            let text = self.scraper.scrape(link).unwrap_or_else(|e| {
                log::warn!("Scraping {link} failed: {e}");
                String::new()
            });
            let snippet = self.snippet_for(&text);
            log::info!("{link}\n{snippet}");
            results.push(SearchResult::for_page(link, snippet));
        }

        if let Err(e) = self.store.save(&results) {
            log::warn!("Could not save search results: {e}");
        }

        if results.is_empty() {
            on_status(STATUS_NOTHING_USEFUL);
        } else {
            on_status(STATUS_COMPLETE);
        }
        results
    }

    fn upload(&self, face: &Frame) -> Option<String> {
        let jpeg = self
            .image_writer
            .encode(face)
            .map_err(|e| log::warn!("Could not encode face crop: {e}"))
            .ok()?;
        self.image_host
            .upload(&jpeg)
            .map_err(|e| log::warn!("Image upload failed: {e}"))
            .ok()
    }

    fn snippet_for(&self, text: &str) -> String {
        if text.chars().count() <= MIN_SUMMARY_INPUT_CHARS {
            return FALLBACK_SNIPPET.to_string();
        }
        self.summarizer.summarize(text).unwrap_or_else(|e| {
            log::warn!("Summarizing page text failed: {e}");
            FALLBACK_SNIPPET.to_string()
        })
    }
}
