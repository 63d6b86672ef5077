//! Error types and Result alias for the webshop client

use thiserror::Error;

/// Main error type for the webshop client.
///
/// Every variant is terminal for the operation that raised it: the caller
/// surfaces the message and the owning projection keeps its previous state.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Response shape did not match what the endpoint is expected to return
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Network or timeout failure before a response could be parsed
    #[error("Request failed: {0}")]
    Transport(String),

    /// A local precondition failed; no network call was made
    #[error("{0}")]
    ValidationRejected(String),

    /// The server answered the request with success = false
    #[error("{0}")]
    ServerRejected(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedPayload(err.to_string())
    }
}
