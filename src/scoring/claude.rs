// src/scoring/claude.rs
//! Anthropic Messages API backend

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::CompletionBackend;
use crate::app_log;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 600;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct ClaudeBackend {
    client: Client,
    api_key: String,
    model: String,
}

impl ClaudeBackend {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

/// First text block of a Messages API response body
fn first_text(body: &str) -> Result<String> {
    let response: MessagesResponse =
        serde_json::from_str(body).context("Failed to parse Anthropic response")?;

    response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .find_map(|block| block.text)
        .map(|text| text.trim().to_string())
        .context("Anthropic response contained no text")
}

#[async_trait]
impl CompletionBackend for ClaudeBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            anyhow::bail!("ANTHROPIC_API_KEY is not set");
        }

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Anthropic response body")?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            app_log!(error, "Anthropic API error {}: {}", status, message);
            anyhow::bail!("Anthropic API returned error {}: {}", status, message);
        }

        first_text(&body)
    }
}
