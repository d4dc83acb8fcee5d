use thiserror::Error;

/// Errors from [`crate::geocoder::Geocoder::search`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The query string was empty or whitespace.
    #[error("geocoding query must not be empty")]
    EmptyQuery,
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success status.
    #[error("request to {url} failed with status {status}: {message}")]
    HttpError {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request failed before a response arrived.
    #[error("request to {url} failed: {message}")]
    NetworkError {
        /// Request URL.
        url: String,
        /// Error description.
        message: String,
    },
    /// The response body was not the expected JSON array.
    #[error("failed to parse geocoding response: {message}")]
    ParseError {
        /// Error description.
        message: String,
    },
}
