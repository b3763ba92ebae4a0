use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of content strings folded into the bundle summary.
pub const SUMMARY_ITEMS: usize = 3;
/// Number of content strings kept as key points after the summary.
pub const KEY_POINT_ITEMS: usize = 7;

// --- Sections ---

/// The fixed set of research sections. Declaration order is the order
/// sections are aggregated and summarized in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionName {
    #[serde(rename = "Latest News")]
    LatestNews,
    #[serde(rename = "General Information")]
    GeneralInformation,
    #[serde(rename = "Community Discussions")]
    CommunityDiscussions,
    #[serde(rename = "Social Media Insights")]
    SocialMediaInsights,
    #[serde(rename = "Video Content")]
    VideoContent,
}

impl SectionName {
    pub const ALL: [SectionName; 5] = [
        SectionName::LatestNews,
        SectionName::GeneralInformation,
        SectionName::CommunityDiscussions,
        SectionName::SocialMediaInsights,
        SectionName::VideoContent,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionName::LatestNews => "Latest News",
            SectionName::GeneralInformation => "General Information",
            SectionName::CommunityDiscussions => "Community Discussions",
            SectionName::SocialMediaInsights => "Social Media Insights",
            SectionName::VideoContent => "Video Content",
        }
    }

    /// Exact-title lookup. Newsletter section names outside the research
    /// set (e.g. "Podcasts") return `None`.
    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.title() == title)
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

// --- Source records ---

/// One scraped item, normalized away from whichever provider produced it.
/// Every field is present, trimmed, and possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub title: String,
    pub description: String,
    pub text: String,
    pub url: String,
    pub date: String,
    pub author: String,
    pub channel: String,
}

impl SourceRecord {
    /// Parse a loosely-typed provider mapping. Never fails: absent keys,
    /// nulls, arrays and objects all resolve to an empty string, and a
    /// non-object input yields an all-empty record.
    pub fn from_raw(raw: &serde_json::Value) -> Self {
        let field = |key: &str| -> String {
            match raw.get(key) {
                Some(serde_json::Value::String(s)) => s.trim().to_string(),
                Some(serde_json::Value::Number(n)) => n.to_string(),
                Some(serde_json::Value::Bool(b)) => b.to_string(),
                _ => String::new(),
            }
        };

        Self {
            title: field("title"),
            description: field("description"),
            text: field("text"),
            url: field("url"),
            date: field("date"),
            author: field("author"),
            channel: field("channel"),
        }
    }

    /// `title + " " + description`, kept as concatenated, or `None` when it
    /// is blank after trimming.
    pub fn content_line(&self) -> Option<String> {
        let line = format!("{} {}", self.title, self.description);
        (!line.trim().is_empty()).then_some(line)
    }
}

// --- Research bundle ---

/// Aggregated research for one topic. Built once by the researcher and
/// read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchBundle {
    pub summary: String,
    pub key_points: Vec<String>,
    pub sources: BTreeSet<String>,
    pub sections: BTreeMap<SectionName, Vec<SourceRecord>>,
}

impl ResearchBundle {
    /// Derive sources, summary and key points from per-section records.
    pub fn from_sections(sections: BTreeMap<SectionName, Vec<SourceRecord>>) -> Self {
        let sources: BTreeSet<String> = sections
            .values()
            .flatten()
            .filter(|r| !r.url.is_empty())
            .map(|r| r.url.clone())
            .collect();

        let content: Vec<String> = sections
            .values()
            .flatten()
            .filter_map(SourceRecord::content_line)
            .collect();

        let summary = content
            .iter()
            .take(SUMMARY_ITEMS)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        let key_points = content
            .into_iter()
            .skip(SUMMARY_ITEMS)
            .take(KEY_POINT_ITEMS)
            .collect();

        Self {
            summary,
            key_points,
            sources,
            sections,
        }
    }

    /// Records for a section by display title. Unknown titles and sections
    /// whose provider failed both read as empty.
    pub fn section(&self, title: &str) -> &[SourceRecord] {
        SectionName::from_title(title)
            .and_then(|name| self.sections.get(&name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn record_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

// --- Review ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub improved_content: String,
    pub suggestions: Vec<String>,
    /// Always within `[0.0, 1.0]`.
    pub quality_score: f64,
}

/// Optional framing for the finalized newsletter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsletterMetadata {
    pub topic: Option<String>,
    pub summary: Option<String>,
}

// --- Run records ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Error,
}

/// What one pipeline run hands to a record sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: RunStatus,
    /// ISO-8601 / RFC 3339.
    pub timestamp: String,
}

impl RunRecord {
    pub fn success(topic: impl Into<String>, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            topic: topic.into(),
            content: Some(content.into()),
            error: None,
            status: RunStatus::Success,
            timestamp: at.to_rfc3339(),
        }
    }

    pub fn failure(topic: impl Into<String>, error: impl fmt::Display, at: DateTime<Utc>) -> Self {
        Self {
            topic: topic.into(),
            content: None,
            error: Some(format!("Error in newsletter generation: {error}")),
            status: RunStatus::Error,
            timestamp: at.to_rfc3339(),
        }
    }
}
