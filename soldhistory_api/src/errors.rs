//! Error types for the site client.

/// Errors that can occur when building search URLs or fetching pages.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The configured base URL could not be parsed.
    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// The request never produced a response (connect error, timeout, broken body).
    #[error("request failed: {reason}")]
    RequestFailed { reason: String },
}
