use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::domain::tip_summarizer::{build_prompt, is_well_formed, TipSummarizer};
use crate::shared::constants::{DEFAULT_OPENAI_MODEL, OPENAI_API_URL};

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion service returned HTTP {0}")]
    Status(u16),
    #[error("completion has no content")]
    Empty,
    #[error("completion is missing the Name line")]
    Malformed,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Chat-completions summarizer producing the fixed tip block.
pub struct OpenAiSummarizer {
    client: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_url: OPENAI_API_URL.to_string(),
            api_key: api_key.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        if !model.is_empty() {
            self.model = model.to_string();
        }
        self
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    fn complete(&self, prompt: &str) -> Result<String, SummarizeError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;
        if !response.status().is_success() {
            return Err(SummarizeError::Status(response.status().as_u16()));
        }

        let body: ChatResponse = response.json()?;
        let reply = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(SummarizeError::Empty)?;
        if !is_well_formed(&reply) {
            return Err(SummarizeError::Malformed);
        }
        Ok(reply)
    }
}

impl TipSummarizer for OpenAiSummarizer {
    fn summarize(&self, text: &str) -> Result<String, Box<dyn std::error::Error>> {
        Ok(self.complete(&build_prompt(text))?)
    }
}
