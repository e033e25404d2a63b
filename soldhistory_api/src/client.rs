//! HTTP client for the sold-history search pages.

use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use crate::{user_agent::get_user_agent, Error};

/// A response from the search endpoint, whatever its status.
#[derive(Debug)]
pub struct FetchedPage {
    /// The URL that was requested.
    pub url: Url,
    pub status: StatusCode,
    pub body: String,
}

impl FetchedPage {
    /// True only for `200 OK`; any other status is a failed request.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Canonical reason phrase for the status, e.g. "Not Found".
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown Status")
    }
}

/// HTTP client for the search endpoint.
///
/// Sends browser-like headers and a randomized user agent. Cheap to clone:
/// clones share one connection pool, so a client can be handed to many
/// concurrent tasks.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    /// Creates a client with reqwest's default timeout behaviour.
    pub fn new() -> Result<Self, Error> {
        Self::build(None)
    }

    /// Creates a client that gives up on a request after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder().user_agent(get_user_agent());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            Error::ClientBuild(e)
        })?;
        Ok(Self { http })
    }

    /// Fetches one search page.
    ///
    /// Non-success statuses are returned as a [`FetchedPage`] for the caller to
    /// classify. Only failures that produce no response at all are errors.
    pub async fn fetch(&self, url: Url) -> Result<FetchedPage, Error> {
        tracing::debug!("GET {}", url);
        let resp = self
            .http
            .get(url.clone())
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-AU,en;q=0.9")
            .header("cache-control", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("Failed to get {}: {}", url, e);
                Error::RequestFailed {
                    reason: transport_reason(&e).to_string(),
                }
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::debug!("Failed to read response body from {}: {}", url, e);
            Error::RequestFailed {
                reason: transport_reason(&e).to_string(),
            }
        })?;

        Ok(FetchedPage { url, status, body })
    }
}

/// Short, groupable description of a request that got no usable response.
fn transport_reason(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "Timed Out"
    } else if err.is_connect() {
        "Connection Failed"
    } else if err.is_body() || err.is_decode() {
        "Invalid Response Body"
    } else {
        "Request Failed"
    }
}
