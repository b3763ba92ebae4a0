use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::traits::PromptBuilder;

use super::client::ClaudeClient;
use super::types::*;
use super::Claude;

const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct ClaudePromptBuilder {
    agent: Claude,
    input: String,
    preamble: Option<String>,
    temperature: Option<f32>,
    max_tokens: u32,
    max_retries: u32,
}

impl ClaudePromptBuilder {
    pub(crate) fn new(agent: Claude, input: String) -> Self {
        let max_retries = agent.max_retries;
        Self {
            agent,
            input,
            preamble: None,
            temperature: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_retries,
        }
    }

    fn build_request(&self) -> ChatRequest {
        let mut request = ChatRequest::new(&self.agent.model)
            .max_tokens(self.max_tokens)
            .message(WireMessage::user(&self.input));
        if let Some(ref preamble) = self.preamble {
            request = request.system(preamble);
        }
        if let Some(temp) = self.temperature {
            request = request.temperature(temp);
        }
        request
    }
}

#[async_trait]
impl PromptBuilder for ClaudePromptBuilder {
    fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    async fn send(self) -> Result<String> {
        if self.input.trim().is_empty() {
            bail!("Prompt has no user content");
        }
        let request = self.build_request();
        let client = ClaudeClient::new(
            &self.agent.api_key,
            self.agent.base_url.as_deref(),
            self.max_retries,
        );
        client
            .chat(&request)
            .await?
            .text()
            .ok_or_else(|| anyhow!("No text in Claude response"))
    }
}
