use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApifyError>;

#[derive(Debug, Error)]
pub enum ApifyError {
    #[error("Apify request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx from the API. `message` is the raw response body.
    #[error("Apify API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Could not decode Apify payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Actor {actor} finished with status {status}")]
    RunFailed { actor: String, status: String },
}

impl ApifyError {
    /// Errors worth retrying later: transport failures, rate limits and
    /// server-side trouble.
    pub fn is_transient(&self) -> bool {
        match self {
            ApifyError::Network(_) => true,
            ApifyError::Api { status, .. } => *status == 429 || *status >= 500,
            ApifyError::Decode(_) | ApifyError::RunFailed { .. } => false,
        }
    }
}
