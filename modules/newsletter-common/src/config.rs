use std::env;
use std::path::PathBuf;

use crate::error::{NewsletterError, Result};
use crate::settings::PipelineSettings;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Process configuration loaded from environment variables.
/// Holds secrets and env-specific values; pipeline tunables live in the
/// TOML `PipelineSettings`.
#[derive(Debug, Clone)]
pub struct Config {
    // Providers
    pub apify_api_key: String,

    // Generation
    pub anthropic_api_key: String,
    pub model: String,
    pub temperature: f32,

    // Optional TOML settings file
    pub settings_path: Option<PathBuf>,
}

impl Config {
    /// Load from the environment (and `.env` if present). Missing
    /// credentials fail here, before any pipeline stage runs.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let temperature = match env::var("NEWSLETTER_TEMPERATURE") {
            Ok(raw) => raw.parse().map_err(|_| {
                NewsletterError::Config(format!("NEWSLETTER_TEMPERATURE must be a number, got {raw:?}"))
            })?,
            Err(_) => DEFAULT_TEMPERATURE,
        };

        let config = Self {
            apify_api_key: required_env("APIFY_API_KEY")?,
            anthropic_api_key: required_env("ANTHROPIC_API_KEY")?,
            model: env::var("NEWSLETTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            temperature,
            settings_path: env::var("NEWSLETTER_SETTINGS").ok().map(PathBuf::from),
        };

        config.log_redacted();
        Ok(config)
    }

    /// Settings from `settings_path`, or defaults when unset.
    pub fn load_settings(&self) -> Result<PipelineSettings> {
        match self.settings_path {
            Some(ref path) => PipelineSettings::from_file(path),
            None => Ok(PipelineSettings::default()),
        }
    }

    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n = val.char_indices().nth(5).map(|(i, _)| i).unwrap_or(val.len());
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  APIFY_API_KEY: {}", preview(&self.apify_api_key));
        tracing::info!("  ANTHROPIC_API_KEY: {}", preview(&self.anthropic_api_key));
        tracing::info!(model = %self.model, temperature = self.temperature, "  Generation");
        match self.settings_path {
            Some(ref path) => tracing::info!("  NEWSLETTER_SETTINGS: {}", path.display()),
            None => tracing::info!("  NEWSLETTER_SETTINGS: <not set>"),
        }
    }
}

fn required_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(NewsletterError::Config(format!(
            "{key} environment variable is required"
        ))),
    }
}
