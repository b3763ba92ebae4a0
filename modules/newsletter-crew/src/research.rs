// Research stage: fan out to every provider, tolerate individual failures,
// merge what came back into one ResearchBundle.
//
// Each provider call runs under its own timeout, and the whole fan-out runs
// under an overall deadline. Providers still running at the deadline are
// dropped; whatever already landed is aggregated.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{info, warn};

use newsletter_common::{NewsletterError, ResearchBundle, ResearchSettings, SectionName, SourceRecord};

// ---------------------------------------------------------------------------
// Provider boundary
// ---------------------------------------------------------------------------

/// The research providers. Each lands in exactly one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    News,
    Web,
    Community,
    Social,
    Video,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::News,
        ProviderKind::Web,
        ProviderKind::Community,
        ProviderKind::Social,
        ProviderKind::Video,
    ];

    pub fn section(&self) -> SectionName {
        match self {
            ProviderKind::News => SectionName::LatestNews,
            ProviderKind::Web => SectionName::GeneralInformation,
            ProviderKind::Community => SectionName::CommunityDiscussions,
            ProviderKind::Social => SectionName::SocialMediaInsights,
            ProviderKind::Video => SectionName::VideoContent,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::News => "news",
            ProviderKind::Web => "web",
            ProviderKind::Community => "community",
            ProviderKind::Social => "social",
            ProviderKind::Video => "video",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for one provider invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderQuery {
    pub terms: Vec<String>,
    pub max_items: u32,
    pub language: String,
    /// Recency window. Google-style (`m1`) for search providers, Reddit-style
    /// (`month`) for community.
    pub recency: String,
    pub sort: String,
}

impl ProviderQuery {
    pub fn for_kind(kind: ProviderKind, topic: &str, settings: &ResearchSettings) -> Self {
        let topic = topic.trim().to_string();
        match kind {
            ProviderKind::News => Self {
                terms: vec![topic],
                max_items: settings.news_max_items,
                language: settings.news_language.clone(),
                recency: settings.recency_window.clone(),
                sort: settings.sort_by.clone(),
            },
            ProviderKind::Web => Self {
                terms: vec![topic],
                max_items: settings.results_per_page,
                language: settings.language_code.clone(),
                recency: settings.recency_window.clone(),
                sort: settings.sort_by.clone(),
            },
            ProviderKind::Community => {
                let terms = if settings.subreddits.is_empty() {
                    vec![topic]
                } else {
                    settings
                        .subreddits
                        .iter()
                        .map(|s| format!("{topic} subreddit:{s}"))
                        .collect()
                };
                Self {
                    terms,
                    max_items: settings.community_max_items,
                    language: settings.language_code.clone(),
                    recency: settings.community_time.clone(),
                    sort: settings.sort_by.clone(),
                }
            }
            ProviderKind::Social => Self {
                terms: vec![topic],
                max_items: settings.social_max_items,
                language: settings.language_code.clone(),
                recency: settings.recency_window.clone(),
                sort: settings.sort_by.clone(),
            },
            ProviderKind::Video => Self {
                terms: vec![topic],
                max_items: settings.video_max_items,
                language: settings.language_code.clone(),
                recency: settings.recency_window.clone(),
                sort: settings.sort_by.clone(),
            },
        }
    }
}

/// An external data source. `fetch` returns raw JSON whose shape is not
/// guaranteed; anything other than an array counts as "no results".
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;
    async fn fetch(&self, query: &ProviderQuery) -> Result<serde_json::Value>;
}

// ---------------------------------------------------------------------------
// Researcher
// ---------------------------------------------------------------------------

pub struct Researcher {
    providers: Vec<Arc<dyn Provider>>,
    settings: ResearchSettings,
}

impl Researcher {
    pub fn new(providers: Vec<Arc<dyn Provider>>, settings: ResearchSettings) -> Self {
        Self {
            providers,
            settings,
        }
    }

    /// Query every provider concurrently and merge the results.
    ///
    /// Only errors in strict mode, and only when no provider produced usable
    /// output. Otherwise failed sections are simply absent from the bundle.
    pub async fn research(&self, topic: &str) -> Result<ResearchBundle, NewsletterError> {
        let total = self.providers.len();
        let per_call = self.settings.provider_timeout();
        // A deadline past what the clock can represent means no deadline.
        let deadline = Instant::now().checked_add(self.settings.deadline());
        if deadline.is_none() {
            warn!(
                deadline_secs = self.settings.deadline_secs,
                "Research deadline out of range, running without one"
            );
        }

        info!(topic, providers = total, "Starting research");

        // Queued calls only start (and start their timeout) once polled.
        let started = AtomicUsize::new(0);
        let started = &started;

        let calls = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            let query = ProviderQuery::for_kind(provider.kind(), topic, &self.settings);
            async move {
                started.fetch_add(1, Ordering::Relaxed);
                let kind = provider.kind();
                let outcome = match tokio::time::timeout(per_call, provider.fetch(&query)).await {
                    Ok(Ok(value)) => parse_records(value),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(_) => Err(format!("timed out after {}s", per_call.as_secs())),
                };
                (kind, outcome)
            }
        });

        let mut pending = stream::iter(calls).buffer_unordered(self.settings.max_concurrency.max(1));

        let mut sections: BTreeMap<SectionName, Vec<SourceRecord>> = BTreeMap::new();
        let mut succeeded = 0usize;
        let mut finished = 0usize;

        loop {
            let next = match deadline {
                Some(at) => tokio::time::timeout_at(at, pending.next()).await,
                None => Ok(pending.next().await),
            };
            match next {
                Ok(Some((kind, Ok(records)))) => {
                    finished += 1;
                    succeeded += 1;
                    info!(provider = %kind, records = records.len(), "Provider returned records");
                    sections.entry(kind.section()).or_default().extend(records);
                }
                Ok(Some((kind, Err(reason)))) => {
                    finished += 1;
                    warn!(provider = %kind, error = %reason, "Provider failed, section left empty");
                }
                Ok(None) => break,
                Err(_) => {
                    let started = started.load(Ordering::Relaxed);
                    warn!(
                        in_flight = started - finished,
                        not_started = total - started,
                        deadline_secs = self.settings.deadline_secs,
                        "Research deadline passed, abandoning remaining providers"
                    );
                    break;
                }
            }
        }
        drop(pending);

        if self.settings.strict && total > 0 && succeeded == 0 {
            return Err(NewsletterError::AllProvidersFailed(total));
        }

        let bundle = ResearchBundle::from_sections(sections);
        info!(
            succeeded,
            failed = total - succeeded,
            records = bundle.record_count(),
            sources = bundle.sources.len(),
            "Research complete"
        );
        Ok(bundle)
    }
}

/// Provider output → records. Non-array output is a provider defect.
fn parse_records(value: serde_json::Value) -> std::result::Result<Vec<SourceRecord>, String> {
    match value {
        serde_json::Value::Array(items) => Ok(items.iter().map(SourceRecord::from_raw).collect()),
        other => Err(format!("returned a non-sequence result ({})", json_kind(&other))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_kind_maps_to_a_distinct_section() {
        let sections: std::collections::HashSet<_> =
            ProviderKind::ALL.iter().map(|k| k.section()).collect();
        assert_eq!(sections.len(), ProviderKind::ALL.len());
    }

    #[test]
    fn community_query_scopes_subreddits() {
        let settings = ResearchSettings::default();
        let query = ProviderQuery::for_kind(ProviderKind::Community, " AI agents ", &settings);
        assert_eq!(
            query.terms,
            vec![
                "AI agents subreddit:artificial",
                "AI agents subreddit:MachineLearning",
                "AI agents subreddit:AINews",
            ]
        );
        assert_eq!(query.recency, "month");
        assert_eq!(query.max_items, 10);
    }

    #[test]
    fn community_query_without_subreddits_uses_topic() {
        let settings = ResearchSettings {
            subreddits: vec![],
            ..Default::default()
        };
        let query = ProviderQuery::for_kind(ProviderKind::Community, "rust", &settings);
        assert_eq!(query.terms, vec!["rust"]);
    }

    #[test]
    fn search_queries_carry_language_and_recency() {
        let settings = ResearchSettings::default();
        let web = ProviderQuery::for_kind(ProviderKind::Web, "rust", &settings);
        assert_eq!(web.language, "en");
        assert_eq!(web.recency, "m1");
        assert_eq!(web.max_items, 5);
        let news = ProviderQuery::for_kind(ProviderKind::News, "rust", &settings);
        assert_eq!(news.language, "US:en");
    }

    #[test]
    fn parse_records_rejects_non_sequences() {
        assert!(parse_records(json!("Error running Apify actor")).is_err());
        assert!(parse_records(json!({"items": []})).is_err());
        let records = parse_records(json!([{"title": "a"}, 7])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "a");
        assert_eq!(records[1], SourceRecord::default());
    }
}
