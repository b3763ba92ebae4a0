//! Deterministic review and finalization of a finished newsletter.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use newsletter_common::{NewsletterMetadata, ReviewPenalties, ReviewResult};

static HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6} ").unwrap());
static HEADER_LEVEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^(#{1,6}) ").unwrap());
static HYPERLINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*?\]\(.*?\)").unwrap());
static BROKEN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(\s*\)").unwrap());
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s").unwrap());
static TERMINATED_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s.*\n$").unwrap());

pub const NEWSLETTER_TITLE: &str = "# AI Technology Newsletter";
pub const FOOTER_DISCLAIMER: &str = "*This newsletter is automatically generated using AI technology.*";
pub const FOOTER_CONTACT: &str = "*For more information, please contact us.*";
pub const PRAISE: &str = "Content is well-structured and properly formatted";

/// Scores a document against a fixed list of structural defects.
#[derive(Debug, Clone, Default)]
pub struct Reviewer {
    penalties: ReviewPenalties,
}

impl Reviewer {
    pub fn new(penalties: ReviewPenalties) -> Self {
        Self { penalties }
    }

    /// Run every check against the input as given. Only blank-line runs are
    /// repaired; everything else is reported as a suggestion.
    pub fn review(&self, content: &str) -> ReviewResult {
        let p = &self.penalties;
        let mut suggestions = Vec::new();
        let mut penalty = 0.0;
        let mut improved_content = content.to_string();

        if content.chars().count() < p.min_length {
            suggestions.push("Content is too short - needs more detail".to_string());
            penalty += p.too_short;
        }

        if !HEADER_LINE.is_match(content) {
            suggestions.push("Missing section headers".to_string());
            penalty += p.missing_headers;
        }

        if !HYPERLINK.is_match(content) {
            suggestions.push("Missing hyperlinks".to_string());
            penalty += p.missing_links;
        }

        if BLANK_RUN.is_match(content) {
            suggestions.push("Excessive blank lines - formatting needs cleanup".to_string());
            improved_content = BLANK_RUN.replace_all(&improved_content, "\n\n").into_owned();
            penalty += p.excessive_blank_lines;
        }

        if has_header_jump(content) {
            suggestions.push("Inconsistent header hierarchy".to_string());
            penalty += p.header_hierarchy;
        }

        let broken = BROKEN_LINK.find_iter(content).count();
        if broken > 0 {
            suggestions.push(format!("Found {broken} broken link(s)"));
            penalty += p.broken_link * broken as f64;
        }

        if LIST_ITEM.is_match(content) && !TERMINATED_LIST_ITEM.is_match(content) {
            suggestions.push("List items should end with newlines".to_string());
            penalty += p.list_formatting;
        }

        let quality_score = (1.0 - penalty).clamp(0.0, 1.0);
        if quality_score > p.praise_threshold {
            suggestions.push(PRAISE.to_string());
        }

        tracing::debug!(quality_score, issues = suggestions.len(), "Reviewed newsletter");

        ReviewResult {
            improved_content,
            suggestions,
            quality_score,
        }
    }
}

/// True when any header is more than one level deeper than the one before.
fn has_header_jump(content: &str) -> bool {
    let levels: Vec<usize> = HEADER_LEVEL
        .captures_iter(content)
        .map(|c| c[1].len())
        .collect();
    levels.windows(2).any(|w| w[1] > w[0] + 1)
}

/// Wrap reviewed content with the title, issue date, optional metadata and
/// the footer.
pub fn finalize_newsletter(
    content: &str,
    metadata: Option<&NewsletterMetadata>,
    issue_date: NaiveDate,
) -> String {
    let mut out = vec![
        NEWSLETTER_TITLE.to_string(),
        format!("*Issue Date: {}*\n", issue_date.format("%B %d, %Y")),
    ];

    if let Some(meta) = metadata {
        if let Some(topic) = meta.topic.as_deref().filter(|t| !t.is_empty()) {
            out.push(format!("**Focus Topic:** {topic}\n"));
        }
        if let Some(summary) = meta.summary.as_deref().filter(|s| !s.is_empty()) {
            out.push("## Executive Summary".to_string());
            out.push(format!("{summary}\n"));
        }
    }

    out.push(content.to_string());
    out.push("\n---".to_string());
    out.push(FOOTER_DISCLAIMER.to_string());
    out.push(FOOTER_CONTACT.to_string());
    out.join("\n")
}
