//! Research fan-out scenarios: partial failure, timeouts, the overall
//! deadline, and strict mode. Time is paused so delays resolve instantly.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use newsletter_common::{NewsletterError, ResearchSettings, SectionName};
use newsletter_crew::research::{Provider, ProviderKind, Researcher};
use newsletter_crew::testing::{linked_item, post_item, MockProvider};

fn settings() -> ResearchSettings {
    ResearchSettings::default()
}

fn as_providers(mocks: &[Arc<MockProvider>]) -> Vec<Arc<dyn Provider>> {
    mocks
        .iter()
        .map(|m| Arc::clone(m) as Arc<dyn Provider>)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn two_of_five_providers_failing_leaves_three_sections() {
    let mocks = vec![
        Arc::new(MockProvider::returning(
            ProviderKind::News,
            vec![
                linked_item("Agents raise", "https://news/1", "Funding round"),
                linked_item("Shared story", "https://shared", "Also on the web"),
            ],
        )),
        Arc::new(MockProvider::failing(ProviderKind::Web, "actor crashed")),
        Arc::new(MockProvider::returning(
            ProviderKind::Community,
            vec![json!({"title": "Which framework?", "url": "https://shared", "text": "Asking"})],
        )),
        Arc::new(MockProvider::non_sequence(
            ProviderKind::Social,
            json!("Error running Apify actor"),
        )),
        Arc::new(MockProvider::returning(
            ProviderKind::Video,
            vec![linked_item("Agent demo", "https://yt/1", "")],
        )),
    ];

    let bundle = Researcher::new(as_providers(&mocks), settings())
        .research("AI agents")
        .await
        .unwrap();

    assert!(bundle.section("General Information").is_empty());
    assert!(bundle.section("Social Media Insights").is_empty());
    assert!(!bundle.sections.contains_key(&SectionName::GeneralInformation));
    assert_eq!(bundle.section("Latest News").len(), 2);
    assert_eq!(bundle.section("Community Discussions").len(), 1);
    assert_eq!(bundle.section("Video Content").len(), 1);

    let sources: Vec<_> = bundle.sources.iter().map(String::as_str).collect();
    assert_eq!(sources, vec!["https://news/1", "https://shared", "https://yt/1"]);

    assert_eq!(
        bundle.summary,
        "Agents raise Funding round\nShared story Also on the web\nWhich framework? "
    );
    assert_eq!(bundle.key_points, vec!["Agent demo "]);

    for mock in &mocks {
        assert_eq!(mock.calls(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn section_order_ignores_completion_order() {
    let news = Arc::new(
        MockProvider::returning(ProviderKind::News, vec![linked_item("Slow news", "https://n", "")])
            .with_delay(Duration::from_secs(30)),
    );
    let video = Arc::new(MockProvider::returning(
        ProviderKind::Video,
        vec![linked_item("Fast video", "https://v", "")],
    ));

    let bundle = Researcher::new(as_providers(&[video, news]), settings())
        .research("AI agents")
        .await
        .unwrap();

    assert_eq!(bundle.summary, "Slow news \nFast video ");
}

#[tokio::test(start_paused = true)]
async fn provider_timeout_empties_only_that_section() {
    let settings = ResearchSettings {
        provider_timeout_secs: 5,
        ..settings()
    };
    let mocks = vec![
        Arc::new(
            MockProvider::returning(ProviderKind::News, vec![linked_item("Late", "https://late", "")])
                .with_delay(Duration::from_secs(60)),
        ),
        Arc::new(MockProvider::returning(
            ProviderKind::Social,
            vec![post_item("On time", "https://x/1", "bob")],
        )),
    ];

    let bundle = Researcher::new(as_providers(&mocks), settings)
        .research("AI agents")
        .await
        .unwrap();

    assert!(bundle.section("Latest News").is_empty());
    assert_eq!(bundle.section("Social Media Insights")[0].author, "bob");
    assert!(!bundle.sources.contains("https://late"));
}

#[tokio::test(start_paused = true)]
async fn deadline_abandons_running_providers_and_keeps_the_rest() {
    let settings = ResearchSettings {
        deadline_secs: 10,
        provider_timeout_secs: 300,
        ..settings()
    };
    let slow = Arc::new(
        MockProvider::returning(ProviderKind::Video, vec![linked_item("Never", "https://never", "")])
            .with_delay(Duration::from_secs(120)),
    );
    let fast = Arc::new(MockProvider::returning(
        ProviderKind::Web,
        vec![linked_item("Docs", "https://docs", "Reference")],
    ));

    let started = tokio::time::Instant::now();
    let bundle = Researcher::new(as_providers(&[slow.clone(), fast]), settings)
        .research("AI agents")
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(120));
    assert_eq!(slow.calls(), 1);
    assert!(bundle.section("Video Content").is_empty());
    assert_eq!(bundle.section("General Information").len(), 1);
    assert_eq!(bundle.summary, "Docs Reference");
}

#[tokio::test(start_paused = true)]
async fn out_of_range_deadline_runs_without_one() {
    let settings = ResearchSettings {
        deadline_secs: u64::MAX,
        provider_timeout_secs: u64::MAX,
        ..settings()
    };
    let slow = Arc::new(
        MockProvider::returning(ProviderKind::News, vec![linked_item("Slow", "https://slow", "")])
            .with_delay(Duration::from_secs(900)),
    );

    let bundle = Researcher::new(as_providers(&[slow]), settings)
        .research("x")
        .await
        .unwrap();

    assert_eq!(bundle.section("Latest News").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_drops_queued_providers_without_calling_them() {
    let settings = ResearchSettings {
        deadline_secs: 10,
        max_concurrency: 1,
        ..settings()
    };
    let running = Arc::new(
        MockProvider::returning(ProviderKind::News, vec![linked_item("Late", "https://late", "")])
            .with_delay(Duration::from_secs(120)),
    );
    let queued = Arc::new(MockProvider::returning(
        ProviderKind::Video,
        vec![linked_item("Queued", "https://q", "")],
    ));

    let bundle = Researcher::new(as_providers(&[running.clone(), queued.clone()]), settings)
        .research("AI agents")
        .await
        .unwrap();

    assert_eq!(running.calls(), 1);
    assert_eq!(queued.calls(), 0);
    assert!(bundle.is_empty());
}

#[tokio::test(start_paused = true)]
async fn default_mode_returns_empty_bundle_when_everything_fails() {
    let mocks = vec![
        Arc::new(MockProvider::failing(ProviderKind::News, "quota")),
        Arc::new(MockProvider::non_sequence(ProviderKind::Web, json!({"error": "bad"}))),
    ];

    let bundle = Researcher::new(as_providers(&mocks), settings())
        .research("AI agents")
        .await
        .unwrap();

    assert!(bundle.is_empty());
    assert!(bundle.sources.is_empty());
    assert_eq!(bundle.summary, "");
}

#[tokio::test(start_paused = true)]
async fn strict_mode_errors_only_when_every_provider_fails() {
    let strict = ResearchSettings {
        strict: true,
        ..settings()
    };

    let all_failing = vec![
        Arc::new(MockProvider::failing(ProviderKind::News, "quota")),
        Arc::new(MockProvider::failing(ProviderKind::Video, "quota")),
    ];
    let err = Researcher::new(as_providers(&all_failing), strict.clone())
        .research("AI agents")
        .await
        .unwrap_err();
    assert!(matches!(err, NewsletterError::AllProvidersFailed(2)));

    let one_empty_success = vec![
        Arc::new(MockProvider::failing(ProviderKind::News, "quota")),
        Arc::new(MockProvider::returning(ProviderKind::Video, vec![])),
    ];
    let bundle = Researcher::new(as_providers(&one_empty_success), strict)
        .research("AI agents")
        .await
        .unwrap();
    assert!(bundle.is_empty());
}

#[tokio::test(start_paused = true)]
async fn providers_receive_kind_specific_queries() {
    let community = Arc::new(MockProvider::returning(ProviderKind::Community, vec![]));
    let news = Arc::new(MockProvider::returning(ProviderKind::News, vec![]));

    Researcher::new(as_providers(&[community.clone(), news.clone()]), settings())
        .research("AI agents")
        .await
        .unwrap();

    let community_query = community.last_query().unwrap();
    assert_eq!(community_query.terms.len(), 3);
    assert!(community_query.terms[0].ends_with("subreddit:artificial"));
    assert_eq!(community_query.recency, "month");

    let news_query = news.last_query().unwrap();
    assert_eq!(news_query.terms, vec!["AI agents"]);
    assert_eq!(news_query.language, "US:en");
    assert_eq!(news_query.max_items, 10);
}
