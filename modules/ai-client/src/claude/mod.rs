mod client;
pub mod prompt_builder;
pub(crate) mod types;

pub use prompt_builder::ClaudePromptBuilder;

/// Default retry budget for rate limits and overload.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Handle on one Claude model. Cheap to clone; each prompt opens its own
/// HTTP client.
#[derive(Clone)]
pub struct Claude {
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) base_url: Option<String>,
    pub(crate) max_retries: u32,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Point at a proxy or mock server instead of api.anthropic.com.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self, input: impl Into<String>) -> ClaudePromptBuilder {
        ClaudePromptBuilder::new(self.clone(), input.into())
    }
}
