pub mod config;
pub mod error;
pub mod settings;
pub mod types;

pub use config::Config;
pub use error::NewsletterError;
pub use settings::{PipelineSettings, ResearchSettings, ReviewPenalties, DEFAULT_NEWSLETTER_SECTIONS};
pub use types::*;
