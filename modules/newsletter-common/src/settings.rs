use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NewsletterError, Result};
use crate::types::SectionName;

/// Sections the writer is asked to produce when none are configured.
pub const DEFAULT_NEWSLETTER_SECTIONS: [&str; 8] = [
    "Latest News",
    "Industry Updates",
    "Tools & Frameworks",
    "Companies & Startups",
    "Research & Development",
    "Community Discussions",
    "Video Content",
    "Podcasts",
];

/// Tunables for one pipeline run, loaded from an optional TOML file.
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Section titles the writer is asked to cover, in order.
    pub sections: Vec<String>,
    /// Section titles rendered from research into the writer's draft.
    pub draft_sections: Vec<String>,
    pub research: ResearchSettings,
    pub review: ReviewPenalties,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            sections: DEFAULT_NEWSLETTER_SECTIONS.map(str::to_string).to_vec(),
            draft_sections: SectionName::ALL.iter().map(|s| s.title().to_string()).collect(),
            research: ResearchSettings::default(),
            review: ReviewPenalties::default(),
        }
    }
}

impl PipelineSettings {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| NewsletterError::Config(format!("Invalid settings: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            NewsletterError::Config(format!("Cannot read settings {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }
}

/// Provider parameters and fan-out limits for the research stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    pub results_per_page: u32,
    pub max_pages_per_query: u32,
    pub language_code: String,
    /// Google News wants region and language together, e.g. `US:en`.
    pub news_language: String,
    pub news_max_items: u32,
    /// Google-style recency window: `d7`, `w2`, `m1`, `y1`.
    pub recency_window: String,
    pub subreddits: Vec<String>,
    pub community_max_items: u32,
    pub community_time: String,
    pub social_max_items: u32,
    pub video_max_items: u32,
    pub sort_by: String,
    pub provider_timeout_secs: u64,
    /// Overall deadline for the whole fan-out. Providers still running
    /// when it passes are dropped.
    pub deadline_secs: u64,
    pub max_concurrency: usize,
    /// Fail the research stage when every provider fails.
    pub strict: bool,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            results_per_page: 5,
            max_pages_per_query: 2,
            language_code: "en".to_string(),
            news_language: "US:en".to_string(),
            news_max_items: 10,
            recency_window: "m1".to_string(),
            subreddits: vec![
                "artificial".to_string(),
                "MachineLearning".to_string(),
                "AINews".to_string(),
            ],
            community_max_items: 10,
            community_time: "month".to_string(),
            social_max_items: 10,
            video_max_items: 5,
            sort_by: "relevance".to_string(),
            provider_timeout_secs: 300,
            deadline_secs: 600,
            max_concurrency: 5,
            strict: false,
        }
    }
}

impl ResearchSettings {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// Quality-score penalties. Shortness weighs double; every other
/// structural defect costs the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewPenalties {
    /// Documents shorter than this many characters are "too short".
    pub min_length: usize,
    pub too_short: f64,
    pub missing_headers: f64,
    pub missing_links: f64,
    pub excessive_blank_lines: f64,
    pub header_hierarchy: f64,
    /// Charged once per broken link.
    pub broken_link: f64,
    pub list_formatting: f64,
    /// Scores strictly above this earn the positive suggestion.
    pub praise_threshold: f64,
}

impl Default for ReviewPenalties {
    fn default() -> Self {
        Self {
            min_length: 100,
            too_short: 0.2,
            missing_headers: 0.1,
            missing_links: 0.1,
            excessive_blank_lines: 0.1,
            header_hierarchy: 0.1,
            broken_link: 0.1,
            list_formatting: 0.1,
            praise_threshold: 0.8,
        }
    }
}
