//! Reviewer scenarios over whole documents.

use newsletter_common::ReviewPenalties;
use newsletter_crew::editor::{Reviewer, PRAISE};
use newsletter_crew::writer::format_markdown;

fn reviewer() -> Reviewer {
    Reviewer::new(ReviewPenalties::default())
}

fn long_body() -> String {
    "Agent frameworks matured quickly this month, with several vendors shipping orchestration tools. "
        .repeat(2)
}

#[test]
fn short_titled_note_is_only_too_short_and_unlinked() {
    let result = reviewer().review("# Title\nShort");

    assert!(result
        .suggestions
        .contains(&"Content is too short - needs more detail".to_string()));
    assert!(!result.suggestions.iter().any(|s| s.contains("broken link")));
    assert!(!result.suggestions.contains(&"Inconsistent header hierarchy".to_string()));
    assert!(!result.suggestions.contains(&PRAISE.to_string()));
}

#[test]
fn three_blank_lines_collapse_to_one() {
    let content = format!(
        "# News\n\n{}\n\n\n\nSee [more](https://example.com).\n",
        long_body()
    );
    let result = reviewer().review(&content);

    assert_eq!(
        result.improved_content,
        format!("# News\n\n{}\n\nSee [more](https://example.com).\n", long_body())
    );
    assert!(result
        .suggestions
        .contains(&"Excessive blank lines - formatting needs cleanup".to_string()));
    assert!(!result.improved_content.contains("\n\n\n"));
    assert!((result.quality_score - 0.9).abs() < 1e-9);
    assert!(result.suggestions.contains(&PRAISE.to_string()));
}

#[test]
fn two_broken_links_cost_two_tenths() {
    let content = format!(
        "# News\n\n{}\n[Missing]() and [Missing]() but [ok](https://ok).\n",
        long_body()
    );
    let result = reviewer().review(&content);

    assert!(result.suggestions.contains(&"Found 2 broken link(s)".to_string()));
    assert!((result.quality_score - 0.8).abs() < 1e-9);
    assert!(!result.suggestions.contains(&PRAISE.to_string()));
}

#[test]
fn header_jump_and_missing_links_stack() {
    let content = format!("# Newsletter\n\n### Deep section\n\n{}\n", long_body());
    let result = reviewer().review(&content);

    assert_eq!(
        result.suggestions,
        vec!["Missing hyperlinks", "Inconsistent header hierarchy"]
    );
    assert!((result.quality_score - 0.8).abs() < 1e-9);
}

#[test]
fn score_stays_in_bounds_for_odd_inputs() {
    let inputs = [
        String::new(),
        "\n\n\n\n".to_string(),
        "- a\n- b".to_string(),
        "[]()".repeat(50),
        "[x](   )".repeat(50),
        "####### not a header\n# a\n#### b".to_string(),
        "ümlaut ".repeat(40),
    ];
    for input in &inputs {
        let score = reviewer().review(input).quality_score;
        assert!((0.0..=1.0).contains(&score), "score {score} for {input:?}");
    }
}

#[test]
fn formatted_draft_passes_review_cleanly() {
    let raw = format!(
        "## Latest News\n\n\n### [Agents ship](https://n/1)\n*Published: today*\n\n{}\n\n\n",
        long_body()
    );
    let formatted = format_markdown(&raw);
    let result = reviewer().review(&formatted);

    assert_eq!(result.improved_content, formatted);
    assert_eq!(result.quality_score, 1.0);
    assert_eq!(result.suggestions, vec![PRAISE]);
}
