//! Tracker error types.

use thiserror::Error;

/// Errors from creating an issue in the tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// HTTP transport error (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The tracker rejected the request.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the tracker.
        status: u16,
        /// Tracker error text, or the raw response body.
        message: String,
    },

    /// The tracker returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// A success response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}
