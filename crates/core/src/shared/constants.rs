pub const CASCADE_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const CASCADE_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

/// Confidence assigned to every face found by the local classifier.
pub const LOCAL_DETECTION_CONFIDENCE: f64 = 0.5;

/// JPEG quality of the detection payload written before each remote call.
pub const PAYLOAD_JPEG_QUALITY: u8 = 80;

pub const ROBOFLOW_API_URL: &str = "https://detect.roboflow.com";
pub const IMGBB_API_URL: &str = "https://api.imgbb.com";
pub const SERPAPI_URL: &str = "https://serpapi.com";
pub const OPENAI_API_URL: &str = "https://api.openai.com";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// At most this many candidate pages are scraped per search.
pub const MAX_CANDIDATE_PAGES: usize = 5;

pub const SCRAPE_TIMEOUT_SECS: u64 = 10;
pub const SCRAPE_MAX_CHARS: usize = 4000;

/// Scraped text must be longer than this to be worth summarizing.
pub const MIN_SUMMARY_INPUT_CHARS: usize = 100;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
