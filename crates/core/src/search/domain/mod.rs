pub mod image_host;
pub mod page_scraper;
pub mod parsed_tip;
pub mod results_store;
pub mod reverse_image_search;
pub mod search_result;
pub mod tip_summarizer;
