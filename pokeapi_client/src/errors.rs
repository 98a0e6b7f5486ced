use thiserror::Error;

/// Errors that can occur while talking to the upstream catalog API.
#[derive(Debug, Error)]
pub enum SourceError {
    /// An error during an API request (e.g., network failure, timeout,
    /// or a body that failed to decode).
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status; carries the response body.
    #[error("API error: {0}")]
    Api(String),
}
