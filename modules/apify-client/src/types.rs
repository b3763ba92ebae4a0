use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Actor inputs ---

/// Proxy block accepted by actors that scrape behind Apify's proxy pool.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyConfig {
    #[serde(rename = "useApifyProxy")]
    pub use_apify_proxy: bool,
    #[serde(rename = "apifyProxyGroups")]
    pub apify_proxy_groups: Vec<String>,
}

impl ProxyConfig {
    pub fn residential() -> Self {
        Self {
            use_apify_proxy: true,
            apify_proxy_groups: vec!["RESIDENTIAL".to_string()],
        }
    }
}

/// Input for the aymorato/super-fast-google-news-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct GoogleNewsInput {
    pub keywords: Vec<String>,
    /// Region and language, e.g. `US:en`.
    pub language: String,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
    pub proxy: ProxyConfig,
}

/// Input for the apify/google-search-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct GoogleSearchInput {
    /// Newline-separated queries; the actor treats each line as one search.
    pub queries: String,
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
    #[serde(rename = "maxPagesPerQuery")]
    pub max_pages_per_query: u32,
    #[serde(rename = "languageCode")]
    pub language_code: String,
    /// Recency window such as `m1` (last month) or `d7`.
    #[serde(rename = "quickDateRange", skip_serializing_if = "Option::is_none")]
    pub quick_date_range: Option<String>,
}

/// Input for the trudax/reddit-scraper-lite actor in search mode.
#[derive(Debug, Clone, Serialize)]
pub struct RedditSearchInput {
    /// Reddit search queries; `subreddit:<name>` scoping is allowed inline.
    pub searches: Vec<String>,
    #[serde(rename = "searchPosts")]
    pub search_posts: bool,
    #[serde(rename = "skipComments")]
    pub skip_comments: bool,
    pub sort: String,
    pub time: String,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
    pub proxy: ProxyConfig,
}

/// Input for the apidojo/twitter-scraper-lite actor.
#[derive(Debug, Clone, Serialize)]
pub struct TweetSearchInput {
    #[serde(rename = "searchTerms")]
    pub search_terms: Vec<String>,
    pub sort: String,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
}

/// Input for the streamers/youtube-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct YouTubeSearchInput {
    #[serde(rename = "searchKeywords")]
    pub search_keywords: String,
    #[serde(rename = "maxResults")]
    pub max_results: u32,
    #[serde(rename = "sortingOrder")]
    pub sorting_order: String,
    #[serde(rename = "dateFilter", skip_serializing_if = "Option::is_none")]
    pub date_filter: Option<String>,
}

// --- API envelopes ---

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunData {
    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self.status.as_str(),
            "FAILED" | "ABORTED" | "TIMED-OUT" | "TIMED_OUT"
        )
    }
}
