//! Apify REST client for the scraper actors behind newsletter research.
//!
//! A run is three calls: start the actor, long-poll the run until it
//! settles, then read the run's default dataset.

pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{
    GoogleNewsInput, GoogleSearchInput, ProxyConfig, RedditSearchInput, RunData,
    TweetSearchInput, YouTubeSearchInput,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";
/// Seconds the API may hold a run-status request open.
const WAIT_FOR_FINISH_SECS: u32 = 60;

pub const GOOGLE_NEWS_SCRAPER: &str = "aymorato~super-fast-google-news-scraper-pay-per-result";
pub const GOOGLE_SEARCH_SCRAPER: &str = "apify~google-search-scraper";
pub const REDDIT_SCRAPER: &str = "trudax~reddit-scraper-lite";
pub const TWEET_SCRAPER: &str = "apidojo~twitter-scraper-lite";
pub const YOUTUBE_SCRAPER: &str = "streamers~youtube-scraper";

pub struct ApifyClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Start an actor run and return without waiting for it.
    pub async fn start_run<I: Serialize + ?Sized>(&self, actor: &str, input: &I) -> Result<RunData> {
        let request = self
            .http
            .post(format!("{}/acts/{actor}/runs", self.base_url))
            .json(input);
        let envelope: ApiResponse<RunData> = self.send(request).await?;
        Ok(envelope.data)
    }

    /// Long-poll until the run succeeds or reaches a terminal failure.
    /// Callers bound the total wait.
    pub async fn wait_for_run(&self, actor: &str, run_id: &str) -> Result<RunData> {
        let url = format!(
            "{}/actor-runs/{run_id}?waitForFinish={WAIT_FOR_FINISH_SECS}",
            self.base_url
        );
        loop {
            let envelope: ApiResponse<RunData> = self.send(self.http.get(&url)).await?;
            let run = envelope.data;
            if run.status == "SUCCEEDED" {
                return Ok(run);
            }
            if run.is_terminal_failure() {
                return Err(ApifyError::RunFailed {
                    actor: actor.to_string(),
                    status: run.status,
                });
            }
            tracing::debug!(actor, run_id, status = %run.status, "Run still in progress");
        }
    }

    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!(
            "{}/datasets/{dataset_id}/items?format=json&clean=true",
            self.base_url
        );
        self.send(self.http.get(url)).await
    }

    /// Start, wait, and read the dataset. Items stay untyped JSON: actor
    /// output schemas drift without notice.
    pub async fn run_actor<I: Serialize + ?Sized>(
        &self,
        actor: &str,
        input: &I,
    ) -> Result<Vec<serde_json::Value>> {
        let run = self.start_run(actor, input).await?;
        tracing::info!(actor, run_id = %run.id, "Apify run started");

        let finished = self.wait_for_run(actor, &run.id).await?;
        let items: Vec<serde_json::Value> =
            self.get_dataset_items(&finished.default_dataset_id).await?;

        let secs = match (finished.started_at, finished.finished_at) {
            (Some(start), Some(end)) => (end - start).num_seconds(),
            _ => 0,
        };
        tracing::info!(actor, count = items.len(), run_secs = secs, "Apify run finished");
        Ok(items)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let resp = request.bearer_auth(&self.token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
