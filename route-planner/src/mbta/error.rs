//! Data source error types.

/// Errors that can occur when fetching lines or stops.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, client timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check MBTA_API_KEY")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by MBTA API")]
    RateLimited,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A single fetch took longer than the configured limit
    #[error("timed out after {secs}s fetching {what}")]
    Timeout { what: String, secs: u64 },

    /// The data source has no such line
    #[error("unknown line: {0}")]
    UnknownLine(String),

    /// Static network file could not be read
    #[error("failed to read network file: {message}")]
    Io { message: String },
}
