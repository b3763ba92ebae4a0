//! Apify-backed research providers.
//!
//! Each provider runs one actor and rewrites its dataset into the
//! `SourceRecord` key set (`title`, `description`, `text`, `url`, `date`,
//! `author`, `channel`), since every actor names those fields differently.

use std::sync::Arc;

use anyhow::Result;
use apify_client::{
    ApifyClient, GoogleNewsInput, GoogleSearchInput, ProxyConfig, RedditSearchInput,
    TweetSearchInput, YouTubeSearchInput,
};
use async_trait::async_trait;
use newsletter_common::ResearchSettings;
use serde_json::{Map, Value};

use crate::research::{Provider, ProviderKind, ProviderQuery};

pub struct ApifyProvider {
    client: Arc<ApifyClient>,
    kind: ProviderKind,
    max_pages_per_query: u32,
}

impl ApifyProvider {
    pub fn new(client: Arc<ApifyClient>, kind: ProviderKind, settings: &ResearchSettings) -> Self {
        Self {
            client,
            kind,
            max_pages_per_query: settings.max_pages_per_query,
        }
    }

    /// One provider per kind, sharing a single HTTP client.
    pub fn all(client: Arc<ApifyClient>, settings: &ResearchSettings) -> Vec<Arc<dyn Provider>> {
        ProviderKind::ALL
            .into_iter()
            .map(|kind| Arc::new(Self::new(Arc::clone(&client), kind, settings)) as Arc<dyn Provider>)
            .collect()
    }

    async fn run(&self, query: &ProviderQuery) -> apify_client::Result<Vec<Value>> {
        let items = match self.kind {
            ProviderKind::News => {
                let input = GoogleNewsInput {
                    keywords: query.terms.clone(),
                    language: query.language.clone(),
                    max_items: query.max_items,
                    proxy: ProxyConfig::residential(),
                };
                self.client.run_actor(apify_client::GOOGLE_NEWS_SCRAPER, &input).await?
            }
            ProviderKind::Web => {
                let input = GoogleSearchInput {
                    queries: query.terms.join("\n"),
                    results_per_page: query.max_items,
                    max_pages_per_query: self.max_pages_per_query,
                    language_code: query.language.clone(),
                    quick_date_range: non_empty(&query.recency),
                };
                self.client.run_actor(apify_client::GOOGLE_SEARCH_SCRAPER, &input).await?
            }
            ProviderKind::Community => {
                let input = RedditSearchInput {
                    searches: query.terms.clone(),
                    search_posts: true,
                    skip_comments: true,
                    sort: query.sort.clone(),
                    time: query.recency.clone(),
                    max_items: query.max_items,
                    proxy: ProxyConfig::residential(),
                };
                self.client.run_actor(apify_client::REDDIT_SCRAPER, &input).await?
            }
            ProviderKind::Social => {
                let input = TweetSearchInput {
                    search_terms: query.terms.clone(),
                    sort: twitter_sort(&query.sort).to_string(),
                    max_items: query.max_items,
                };
                self.client.run_actor(apify_client::TWEET_SCRAPER, &input).await?
            }
            ProviderKind::Video => {
                let input = YouTubeSearchInput {
                    search_keywords: query.terms.join(" "),
                    max_results: query.max_items,
                    sorting_order: query.sort.clone(),
                    date_filter: youtube_date_filter(&query.recency).map(str::to_string),
                };
                self.client.run_actor(apify_client::YOUTUBE_SCRAPER, &input).await?
            }
        };
        Ok(items)
    }
}

#[async_trait]
impl Provider for ApifyProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Value> {
        let items = match self.run(query).await {
            Ok(items) => items,
            Err(e) => {
                tracing::debug!(provider = %self.kind, transient = e.is_transient(), error = %e, "Actor run failed");
                return Err(e.into());
            }
        };
        let records = canonicalize(self.kind, items);
        tracing::debug!(provider = %self.kind, count = records.len(), "Canonicalized actor output");
        Ok(Value::Array(records))
    }
}

// --- Canonicalization ---

/// Rewrite actor items into the `SourceRecord` key set.
pub fn canonicalize(kind: ProviderKind, items: Vec<Value>) -> Vec<Value> {
    match kind {
        // The search actor returns one item per results page.
        ProviderKind::Web => items
            .iter()
            .flat_map(|page| match page.get("organicResults") {
                Some(Value::Array(results)) => results.clone(),
                _ => vec![page.clone()],
            })
            .map(|item| web_record(&item))
            .collect(),
        ProviderKind::News => items.iter().map(news_record).collect(),
        ProviderKind::Community => items
            .iter()
            .filter(|item| {
                item.get("dataType")
                    .and_then(Value::as_str)
                    .map_or(true, |t| t == "post")
            })
            .map(community_record)
            .collect(),
        ProviderKind::Social => items.iter().map(social_record).collect(),
        ProviderKind::Video => items.iter().map(video_record).collect(),
    }
}

fn news_record(item: &Value) -> Value {
    record([
        ("title", first_str(item, &["title"])),
        ("description", first_str(item, &["description", "snippet"])),
        ("url", first_str(item, &["url", "link"])),
        ("date", first_str(item, &["date", "publishedAt", "published"])),
        ("author", first_str(item, &["source", "publisher"])),
    ])
}

fn web_record(item: &Value) -> Value {
    record([
        ("title", first_str(item, &["title"])),
        ("description", first_str(item, &["description", "snippet"])),
        ("url", first_str(item, &["url", "link"])),
        ("date", first_str(item, &["date"])),
    ])
}

fn community_record(item: &Value) -> Value {
    record([
        ("title", first_str(item, &["title"])),
        ("text", first_str(item, &["body", "text"])),
        ("url", first_str(item, &["url", "link"])),
        ("date", first_str(item, &["createdAt", "date"])),
        ("author", first_str(item, &["username", "author"])),
        ("channel", first_str(item, &["communityName", "subreddit"])),
    ])
}

fn social_record(item: &Value) -> Value {
    let author = item
        .pointer("/author/userName")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| first_str(item, &["username", "author"]));
    record([
        ("text", first_str(item, &["full_text", "fullText", "text"])),
        ("url", first_str(item, &["url", "twitterUrl"])),
        ("date", first_str(item, &["createdAt", "date"])),
        ("author", author),
    ])
}

fn video_record(item: &Value) -> Value {
    record([
        ("title", first_str(item, &["title"])),
        ("description", first_str(item, &["description", "text"])),
        ("url", first_str(item, &["url"])),
        ("date", first_str(item, &["date", "uploadDate"])),
        ("channel", first_str(item, &["channelName", "channel"])),
    ])
}

/// First key holding a non-empty string. Non-object items have no keys.
fn first_str(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| item.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn record<const N: usize>(fields: [(&str, Option<String>); N]) -> Value {
    let map: Map<String, Value> = fields
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k.to_string(), Value::String(v))))
        .collect();
    Value::Object(map)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// The tweet actor only knows "Top" and "Latest".
fn twitter_sort(sort: &str) -> &'static str {
    match sort {
        "new" | "latest" | "Latest" => "Latest",
        _ => "Top",
    }
}

/// Map a Google-style recency window onto the YouTube actor's date filter.
pub fn youtube_date_filter(recency: &str) -> Option<&'static str> {
    match recency.chars().next()? {
        'h' => Some("hour"),
        'd' if recency == "d1" => Some("today"),
        'd' | 'w' => Some("week"),
        'm' => Some("month"),
        'y' => Some("year"),
        _ => None,
    }
}
