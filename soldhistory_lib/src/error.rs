//! Error types for the library layer.

use std::fmt;

use crate::fetch::FailureCount;

/// Errors produced by the library layer, wrapping upstream client errors
/// and adding run-level and input validation failures.
#[derive(Debug)]
pub enum SalesError {
    /// An error from the underlying site client (bad base URL, client setup).
    Api(soldhistory_api::Error),
    /// No sale records came out of any request.
    NoSales {
        /// Requests dispatched.
        requests: usize,
        /// Requests that failed outright or returned a non-200 status.
        failed: usize,
        /// Failed requests grouped by status and reason, most frequent first.
        summary: Vec<FailureCount>,
    },
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for SalesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::NoSales { requests, failed, .. } => write!(
                f,
                "no sales records extracted from {} requests ({} failed); \
                 the site may be unreachable or its page layout may have changed",
                requests, failed
            ),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for SalesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<soldhistory_api::Error> for SalesError {
    fn from(e: soldhistory_api::Error) -> Self {
        Self::Api(e)
    }
}
