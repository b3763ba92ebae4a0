use thiserror::Error;

pub type Result<T> = std::result::Result<T, NewsletterError>;

#[derive(Error, Debug)]
pub enum NewsletterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("All {0} research providers failed")]
    AllProvidersFailed(usize),

    #[error("Generation error in {stage} stage: {message}")]
    Generation { stage: String, message: String },

    #[error("Document is empty; nothing to review")]
    EmptyDocument,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
