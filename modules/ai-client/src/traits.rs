use anyhow::Result;
use async_trait::async_trait;

/// Fluent single-turn prompt: one system preamble, one user message.
#[async_trait]
pub trait PromptBuilder: Send + Sized {
    fn preamble(self, preamble: impl Into<String>) -> Self;
    fn temperature(self, temperature: f32) -> Self;
    fn max_tokens(self, max_tokens: u32) -> Self;
    /// Retries on rate limits, overload and server errors. Zero disables.
    fn max_retries(self, retries: u32) -> Self;
    async fn send(self) -> Result<String>;
}
