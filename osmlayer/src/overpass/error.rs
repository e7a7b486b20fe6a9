//! Error types for Overpass requests.

use thiserror::Error;

/// Errors from fetching or decoding one Overpass response.
///
/// None of these are fatal to a layer: the tile is reported as failed and
/// still counts toward batch completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The body is not a valid Overpass JSON document.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The request URL could not be built.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::MalformedResponse(e.to_string())
    }
}
