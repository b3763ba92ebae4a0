use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use newsletter_common::{Config, PipelineSettings, RunStatus};
use newsletter_crew::crew::{CrewDeps, NewsletterCrew};

const DEFAULT_TOPIC: &str = "I want to know everything about AI agents – current news, AI agentic platforms and frameworks, and companies in this field.";

#[derive(Parser, Debug)]
#[command(name = "newsletter", about = "Generate an AI technology newsletter")]
struct Args {
    /// Newsletter topic. Falls back to a general AI-agents topic.
    #[arg(long, env = "NEWSLETTER_TOPIC")]
    topic: Option<String>,

    /// Pipeline settings TOML. Overrides NEWSLETTER_SETTINGS.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the run record as JSON here.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newsletter=info".parse()?))
        .init();

    let args = Args::parse();
    info!("Initializing newsletter generation");

    let config = Config::from_env()?;
    let settings = match args.settings {
        Some(ref path) => PipelineSettings::from_file(path)?,
        None => config.load_settings()?,
    };

    let topic = match args.topic.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => {
            info!("No topic provided, using default topic");
            DEFAULT_TOPIC.to_string()
        }
    };

    let crew = NewsletterCrew::new(CrewDeps::from_config(&config, settings));
    let record = crew.run(&topic).await;

    if let Some(ref path) = args.output {
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run record to {}", path.display()))?;
        info!(path = %path.display(), "Wrote run record");
    }

    match record.status {
        RunStatus::Success => {
            if let Some(ref content) = record.content {
                println!("{content}");
            }
            Ok(())
        }
        RunStatus::Error => anyhow::bail!(record
            .error
            .unwrap_or_else(|| "Error in newsletter generation".to_string())),
    }
}
