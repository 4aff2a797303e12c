use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a single remote call. These never leave [`crate::HeroService`];
/// they are logged and replaced with the operation's fallback value.
#[derive(Debug, Error)]
pub enum HeroApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid api url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("hero api unavailable: {0}")]
    Unavailable(String),
}

impl HeroApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}
