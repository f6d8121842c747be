use base64::{engine::general_purpose::STANDARD as B64, Engine};
use serde::Deserialize;
use thiserror::Error;

use crate::search::domain::image_host::ImageHost;
use crate::shared::constants::IMGBB_API_URL;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("image host returned HTTP {0}")]
    Status(u16),
    #[error("image host rejected the upload")]
    Rejected,
    #[error("image host response has no url")]
    MissingUrl,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
}

#[derive(Deserialize)]
struct UploadData {
    url: Option<String>,
}

/// Uploads face crops to ImgBB so the search engine can fetch them.
pub struct ImgbbHost {
    client: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
}

impl ImgbbHost {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_url: IMGBB_API_URL.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    fn post(&self, jpeg: &[u8]) -> Result<String, UploadError> {
        let encoded = B64.encode(jpeg);
        let response = self
            .client
            .post(format!("{}/1/upload", self.api_url))
            .form(&[("key", self.api_key.as_str()), ("image", encoded.as_str())])
            .send()?;

        if !response.status().is_success() {
            return Err(UploadError::Status(response.status().as_u16()));
        }

        let body: UploadResponse = response.json()?;
        if !body.success {
            return Err(UploadError::Rejected);
        }
        body.data
            .and_then(|d| d.url)
            .filter(|u| !u.is_empty())
            .ok_or(UploadError::MissingUrl)
    }
}

impl ImageHost for ImgbbHost {
    fn upload(&self, jpeg: &[u8]) -> Result<String, Box<dyn std::error::Error>> {
        let url = self.post(jpeg)?;
        log::debug!("uploaded face crop to {url}");
        Ok(url)
    }
}
