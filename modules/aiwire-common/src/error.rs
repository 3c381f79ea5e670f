use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiwireError {
    #[error("Storage error: {0}")]
    Store(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Feed parse error: {0}")]
    FeedParse(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
