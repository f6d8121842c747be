pub mod http_page_scraper;
pub mod imgbb_host;
pub mod json_results_store;
pub mod openai_summarizer;
pub mod serpapi_search;
