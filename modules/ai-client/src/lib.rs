//! Thin Anthropic Messages client used by the newsletter agents.

pub mod claude;
pub mod traits;

pub use claude::{Claude, ClaudePromptBuilder, DEFAULT_MAX_RETRIES};
pub use traits::PromptBuilder;
