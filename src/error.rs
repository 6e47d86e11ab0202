use thiserror::Error;

/// Failure of a single search request.
///
/// Transport errors, non-2xx statuses and undecodable bodies are all the same
/// kind to the rest of the app; the message only feeds logs and the error view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err.to_string())
    }
}
