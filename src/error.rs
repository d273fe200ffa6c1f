use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Failures surfaced by [`crate::services::sync::TweetSync`].
///
/// Messages are deliberately short; the underlying cause is logged where it
/// is caught and is not carried inside the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Required credentials are missing. Retrying without fixing the
    /// environment will not help.
    #[error("{0}")]
    Configuration(String),

    /// Network, HTTP status or response-shape failure talking to the X API.
    #[error("{0}")]
    Fetch(String),

    /// Storage fault while reading tweets.
    #[error("{0}")]
    Read(String),

    /// Storage fault while writing the fetch log.
    #[error("{0}")]
    Update(String),
}

impl SyncError {
    pub fn configuration() -> Self {
        SyncError::Configuration("Twitter configuration is incomplete".to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Configuration(_) => "configuration",
            SyncError::Fetch(_) => "fetch",
            SyncError::Read(_) => "read",
            SyncError::Update(_) => "update",
        }
    }
}
