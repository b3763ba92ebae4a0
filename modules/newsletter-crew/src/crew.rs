//! The newsletter pipeline: research, draft, generate, review, finalize.

use std::sync::Arc;

use ai_client::Claude;
use apify_client::ApifyClient;
use chrono::{Local, NaiveDate, Utc};
use tracing::{error, info};
use typed_builder::TypedBuilder;

use newsletter_common::error::Result;
use newsletter_common::{
    Config, NewsletterError, NewsletterMetadata, PipelineSettings, ResearchBundle, ReviewResult,
    RunRecord,
};

use crate::agents::{AgentPersona, AgentTask, ClaudeGenerator, TextGenerator};
use crate::editor::{finalize_newsletter, Reviewer};
use crate::providers::ApifyProvider;
use crate::research::{Provider, Researcher};
use crate::writer::draft_newsletter;

/// Long-lived resources shared by every run, built once at startup.
#[derive(Clone, TypedBuilder)]
pub struct CrewDeps {
    pub providers: Vec<Arc<dyn Provider>>,
    pub generator: Arc<dyn TextGenerator>,
    #[builder(default)]
    pub settings: PipelineSettings,
}

impl CrewDeps {
    /// Production wiring: Apify providers and a Claude generator.
    pub fn from_config(config: &Config, settings: PipelineSettings) -> Self {
        let apify = Arc::new(ApifyClient::new(config.apify_api_key.clone()));
        let claude = Claude::new(&config.anthropic_api_key, &config.model);

        Self::builder()
            .providers(ApifyProvider::all(apify, &settings.research))
            .generator(Arc::new(ClaudeGenerator::new(claude, config.temperature)))
            .settings(settings)
            .build()
    }
}

/// Everything one successful run produced.
#[derive(Debug, Clone)]
pub struct NewsletterOutcome {
    pub newsletter: String,
    pub review: ReviewResult,
    pub bundle: ResearchBundle,
}

pub struct NewsletterCrew {
    deps: CrewDeps,
    researcher: Researcher,
    reviewer: Reviewer,
}

impl NewsletterCrew {
    pub fn new(deps: CrewDeps) -> Self {
        let researcher = Researcher::new(deps.providers.clone(), deps.settings.research.clone());
        let reviewer = Reviewer::new(deps.settings.review.clone());
        Self {
            deps,
            researcher,
            reviewer,
        }
    }

    pub async fn generate(&self, topic: &str) -> Result<NewsletterOutcome> {
        self.generate_dated(topic, Local::now().date_naive()).await
    }

    /// Run every stage. Generated text moves between stages untouched; only
    /// the editor's final output is reviewed.
    pub async fn generate_dated(&self, topic: &str, issue_date: NaiveDate) -> Result<NewsletterOutcome> {
        info!(topic, "Generating newsletter");
        let sections = &self.deps.settings.sections;

        let bundle = self.researcher.research(topic).await?;

        let findings = serde_json::to_string_pretty(&bundle)
            .map_err(|e| NewsletterError::Anyhow(e.into()))?;
        let report = self
            .stage(
                "research",
                &AgentPersona::researcher(),
                &AgentTask::research(topic, findings),
            )
            .await?;

        let draft = draft_newsletter(&self.deps.settings.draft_sections, &bundle);
        info!(chars = draft.len(), "Drafted sections from research");

        let written = self
            .stage(
                "writing",
                &AgentPersona::writer(),
                &AgentTask::write(sections, format!("{report}\n\n{draft}")),
            )
            .await?;

        let edited = self
            .stage("editing", &AgentPersona::editor(), &AgentTask::edit(written))
            .await?;

        if edited.trim().is_empty() {
            return Err(NewsletterError::EmptyDocument);
        }

        let review = self.reviewer.review(&edited);
        info!(
            quality_score = review.quality_score,
            suggestions = ?review.suggestions,
            "Review complete"
        );

        let metadata = NewsletterMetadata {
            topic: Some(topic.to_string()),
            summary: (!bundle.summary.is_empty()).then(|| bundle.summary.clone()),
        };
        let newsletter = finalize_newsletter(&review.improved_content, Some(&metadata), issue_date);

        Ok(NewsletterOutcome {
            newsletter,
            review,
            bundle,
        })
    }

    /// `generate`, with the outcome folded into a record for the sink.
    pub async fn run(&self, topic: &str) -> RunRecord {
        match self.generate(topic).await {
            Ok(outcome) => {
                info!("Newsletter generation completed successfully");
                RunRecord::success(topic, outcome.newsletter, Utc::now())
            }
            Err(e) => {
                error!(error = %e, "Error in newsletter generation");
                RunRecord::failure(topic, e, Utc::now())
            }
        }
    }

    async fn stage(&self, stage: &str, persona: &AgentPersona, task: &AgentTask) -> Result<String> {
        self.deps
            .generator
            .generate(persona, task)
            .await
            .map_err(|e| NewsletterError::Generation {
                stage: stage.to_string(),
                message: e.to_string(),
            })
    }
}
