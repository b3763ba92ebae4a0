//! Deterministic section rendering: research records in, markdown out.

use newsletter_common::{ResearchBundle, SectionName, SourceRecord};

/// Community post bodies are cut to this many characters.
pub const COMMUNITY_TEXT_LIMIT: usize = 300;
/// Video descriptions are cut to this many characters.
pub const VIDEO_DESCRIPTION_LIMIT: usize = 200;

/// Markdown blocks for one section, in render order.
pub type RenderedSection = Vec<String>;

/// How a section's records are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStyle {
    News,
    Community,
    Social,
    Video,
    Generic,
}

impl SectionStyle {
    pub fn for_title(title: &str) -> Self {
        match SectionName::from_title(title) {
            Some(SectionName::LatestNews) => SectionStyle::News,
            Some(SectionName::CommunityDiscussions) => SectionStyle::Community,
            Some(SectionName::SocialMediaInsights) => SectionStyle::Social,
            Some(SectionName::VideoContent) => SectionStyle::Video,
            Some(SectionName::GeneralInformation) | None => SectionStyle::Generic,
        }
    }

    fn render(self, record: &SourceRecord, out: &mut RenderedSection) {
        match self {
            SectionStyle::News => {
                if let Some(link) = header_link(record) {
                    out.push(link);
                    if !record.date.is_empty() {
                        out.push(format!("*Published: {}*", record.date));
                    }
                    push_body(out, &record.description);
                }
            }
            SectionStyle::Community => {
                if let Some(link) = header_link(record) {
                    out.push(link);
                    if !record.author.is_empty() {
                        out.push(format!("*Posted by {}*", record.author));
                    }
                    push_body(out, &truncate_chars(&record.text, COMMUNITY_TEXT_LIMIT));
                }
            }
            SectionStyle::Social => {
                if !record.text.is_empty() {
                    out.push(format!("> {}", record.text));
                    if !record.author.is_empty() {
                        out.push(format!("*— {}*", record.author));
                    }
                    if !record.url.is_empty() {
                        out.push(format!("[View on Twitter]({})\n", record.url));
                    }
                }
            }
            SectionStyle::Video => {
                if let Some(link) = header_link(record) {
                    out.push(link);
                    if !record.channel.is_empty() {
                        out.push(format!("*By {}*", record.channel));
                    }
                    push_body(
                        out,
                        &truncate_chars(&record.description, VIDEO_DESCRIPTION_LIMIT),
                    );
                }
            }
            SectionStyle::Generic => {
                if let Some(link) = header_link(record) {
                    out.push(link);
                    push_body(out, &record.description);
                }
            }
        }
    }
}

fn header_link(record: &SourceRecord) -> Option<String> {
    if record.title.is_empty() || record.url.is_empty() {
        return None;
    }
    Some(format!("### [{}]({})", record.title, record.url))
}

fn push_body(out: &mut RenderedSection, body: &str) {
    if !body.is_empty() {
        out.push(format!("\n{body}\n"));
    }
}

/// Cut to at most `limit` characters, ending in `...` when cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Blocks for one section. Records missing required fields are skipped.
pub fn render_section(title: &str, bundle: &ResearchBundle) -> RenderedSection {
    let style = SectionStyle::for_title(title);
    let mut blocks = Vec::new();
    for record in bundle.section(title) {
        style.render(record, &mut blocks);
    }
    blocks
}

/// `## <title>` followed by the section's blocks, newline-joined.
pub fn create_section_content(title: &str, bundle: &ResearchBundle) -> String {
    with_header(title, render_section(title, bundle))
}

fn with_header(title: &str, blocks: RenderedSection) -> String {
    let mut content = vec![format!("## {title}\n")];
    content.extend(blocks);
    content.join("\n")
}

/// Render every configured section into one normalized draft. Sections
/// with nothing to show are left out.
pub fn draft_newsletter(sections: &[String], bundle: &ResearchBundle) -> String {
    let parts: Vec<String> = sections
        .iter()
        .filter_map(|title| {
            let blocks = render_section(title, bundle);
            (!blocks.is_empty()).then(|| with_header(title, blocks))
        })
        .collect();
    format_markdown(&parts.join("\n\n"))
}

/// Normalize spacing: at most one blank line in a row, a blank line after
/// every header and blockquote line, no leading or trailing blank lines,
/// no trailing whitespace.
pub fn format_markdown(content: &str) -> String {
    let mut out: Vec<&str> = Vec::new();

    for line in content.lines().map(str::trim_end) {
        if line.is_empty() {
            if out.last().is_some_and(|l| !l.is_empty()) {
                out.push("");
            }
            continue;
        }
        out.push(line);
        if is_header(line) || line.starts_with("> ") {
            out.push("");
        }
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

fn is_header(line: &str) -> bool {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    (1..=6).contains(&hashes) && line[hashes..].starts_with(' ')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn bundle_with(section: SectionName, records: Vec<SourceRecord>) -> ResearchBundle {
        let mut sections = BTreeMap::new();
        sections.insert(section, records);
        ResearchBundle::from_sections(sections)
    }

    #[test]
    fn news_renders_link_date_and_body() {
        let bundle = bundle_with(
            SectionName::LatestNews,
            vec![
                SourceRecord {
                    title: "Agents ship".into(),
                    url: "https://n/1".into(),
                    date: "2025-03-01".into(),
                    description: "Big week.".into(),
                    ..Default::default()
                },
                SourceRecord {
                    title: "No link".into(),
                    ..Default::default()
                },
            ],
        );
        assert_eq!(
            render_section("Latest News", &bundle),
            vec![
                "### [Agents ship](https://n/1)",
                "*Published: 2025-03-01*",
                "\nBig week.\n",
            ]
        );
    }

    #[test]
    fn community_text_is_truncated_to_300_chars() {
        let bundle = bundle_with(
            SectionName::CommunityDiscussions,
            vec![SourceRecord {
                title: "Thread".into(),
                url: "https://r/1".into(),
                author: "alice".into(),
                text: "x".repeat(301),
                ..Default::default()
            }],
        );
        let blocks = render_section("Community Discussions", &bundle);
        assert_eq!(blocks[1], "*Posted by alice*");
        let body = blocks[2].trim();
        assert_eq!(body.chars().count(), 300);
        assert!(body.ends_with("..."));
    }

    #[test]
    fn video_description_is_truncated_to_200_chars() {
        let bundle = bundle_with(
            SectionName::VideoContent,
            vec![SourceRecord {
                title: "Demo".into(),
                url: "https://yt/1".into(),
                channel: "AI Ch".into(),
                description: "é".repeat(201),
                ..Default::default()
            }],
        );
        let blocks = render_section("Video Content", &bundle);
        assert_eq!(blocks[1], "*By AI Ch*");
        assert_eq!(blocks[2].trim().chars().count(), 200);
    }

    #[test]
    fn social_needs_only_text() {
        let bundle = bundle_with(
            SectionName::SocialMediaInsights,
            vec![
                SourceRecord {
                    text: "Agents everywhere".into(),
                    author: "bob".into(),
                    url: "https://x.com/1".into(),
                    ..Default::default()
                },
                SourceRecord {
                    text: "bare".into(),
                    ..Default::default()
                },
                SourceRecord {
                    title: "no text".into(),
                    url: "https://x.com/2".into(),
                    ..Default::default()
                },
            ],
        );
        assert_eq!(
            render_section("Social Media Insights", &bundle),
            vec![
                "> Agents everywhere",
                "*— bob*",
                "[View on Twitter](https://x.com/1)\n",
                "> bare",
            ]
        );
    }

    #[test]
    fn unknown_titles_render_empty_and_general_is_generic() {
        let bundle = bundle_with(
            SectionName::GeneralInformation,
            vec![SourceRecord {
                title: "Wiki".into(),
                url: "https://w".into(),
                date: "ignored".into(),
                ..Default::default()
            }],
        );
        assert!(render_section("Podcasts", &bundle).is_empty());
        assert_eq!(SectionStyle::for_title("Podcasts"), SectionStyle::Generic);
        assert_eq!(render_section("General Information", &bundle), vec!["### [Wiki](https://w)"]);
    }

    #[test]
    fn section_content_is_prefixed_with_header() {
        let bundle = ResearchBundle::default();
        assert_eq!(create_section_content("Podcasts", &bundle), "## Podcasts\n");
    }

    #[test]
    fn truncation_leaves_short_text_alone() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 5), "ab...");
    }

    #[test]
    fn format_markdown_normalizes_spacing() {
        let raw = "\n\n## Title\n### [A](u)   \n\n\n\nbody\n> quote\n*— me*\n- one\n- two\n\n\n";
        assert_eq!(
            format_markdown(raw),
            "## Title\n\n### [A](u)\n\nbody\n> quote\n\n*— me*\n- one\n- two"
        );
    }

    #[test]
    fn format_markdown_is_idempotent() {
        let samples = [
            "",
            "#NotAHeader\ntext",
            "# H\n\n\n\n> q\n> r\n\n- a\n-b\n   \n\n###### deep\n####### too deep",
            "\n\n\n",
        ];
        for raw in samples {
            let once = format_markdown(raw);
            assert_eq!(format_markdown(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn draft_skips_empty_sections() {
        let bundle = bundle_with(
            SectionName::LatestNews,
            vec![SourceRecord {
                title: "Agents ship".into(),
                url: "https://n/1".into(),
                ..Default::default()
            }],
        );
        let sections = vec!["Latest News".to_string(), "Video Content".to_string()];
        assert_eq!(
            draft_newsletter(&sections, &bundle),
            "## Latest News\n\n### [Agents ship](https://n/1)"
        );
    }

    #[test]
    fn draft_section_matches_standalone_section_content() {
        let bundle = bundle_with(
            SectionName::VideoContent,
            vec![SourceRecord {
                title: "Demo".into(),
                url: "https://yt/1".into(),
                channel: "AI Ch".into(),
                description: "d".repeat(250),
                ..Default::default()
            }],
        );
        let sections = vec!["Video Content".to_string()];
        assert_eq!(
            draft_newsletter(&sections, &bundle),
            format_markdown(&create_section_content("Video Content", &bundle))
        );
    }
}
