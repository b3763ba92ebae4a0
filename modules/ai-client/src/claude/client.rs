use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::types::*;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Why a Messages call failed, and whether another attempt could help.
#[derive(Debug)]
enum Failure {
    Retryable(anyhow::Error),
    Fatal(anyhow::Error),
}

impl Failure {
    fn from_status(status: StatusCode, body: String) -> Self {
        let err = anyhow!("Claude API error ({status}): {body}");
        // 529 is Anthropic's "overloaded".
        if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() == 529 || status.is_server_error() {
            Failure::Retryable(err)
        } else {
            Failure::Fatal(err)
        }
    }
}

pub(crate) struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl ClaudeClient {
    pub fn new(api_key: &str, base_url: Option<&str>, max_retries: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or(ANTHROPIC_API_URL).to_string(),
            max_retries,
        }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Send with exponential backoff on retryable failures.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let mut attempt = 0;
        loop {
            match self.attempt(request).await {
                Ok(response) => return Ok(response),
                Err(Failure::Fatal(e)) => return Err(e),
                Err(Failure::Retryable(e)) if attempt >= self.max_retries => return Err(e),
                Err(Failure::Retryable(e)) => {
                    let delay = backoff(attempt);
                    warn!(attempt = attempt + 1, delay_ms = delay.as_millis() as u64, error = %e, "Claude call failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(&self, request: &ChatRequest) -> std::result::Result<ChatResponse, Failure> {
        let url = format!("{}/messages", self.base_url);
        debug!(model = %request.model, chars = request.prompt_chars(), "Claude request");

        let headers = self.headers().map_err(Failure::Fatal)?;
        let response = self
            .http
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| Failure::Retryable(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Failure::from_status(status, body));
        }

        let body: ChatResponse = response.json().await.map_err(|e| Failure::Fatal(e.into()))?;
        if let Some(ref usage) = body.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = body.stop_reason.as_deref().unwrap_or("unknown"),
                "Claude response"
            );
        }
        Ok(body)
    }
}

fn backoff(attempt: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.saturating_pow(attempt.min(6))
}
