//! Concurrent fan-out over search URLs and aggregation of the results.
//!
//! Every URL is fetched in its own tokio task. Each task parses its own page,
//! so tasks share nothing but the HTTP connection pool. Results are joined
//! once all tasks finish and merged in request order.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use soldhistory_api::types::SaleRecord;
use soldhistory_api::{build_urls, Client, Error, SearchQuery, SiteConfig};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::SalesError;
use crate::scrape::{ListingParser, PageSales};
use crate::table::SalesTable;

/// A request that did not return `200 OK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRequest {
    pub url: Url,
    /// HTTP status, or `None` when no response arrived at all.
    pub status: Option<u16>,
    /// Reason phrase for the status, or the transport failure category.
    pub reason: String,
}

/// Number of failed requests sharing a status and reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureCount {
    pub status: Option<u16>,
    pub reason: String,
    pub count: usize,
}

impl FailureCount {
    /// The status code, or `-` when no response arrived.
    pub fn status_label(&self) -> String {
        self.status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Groups failures by `(status, reason)`, most frequent first.
///
/// Ties are ordered by status, then reason.
pub fn summarize_failures(failures: &[FailedRequest]) -> Vec<FailureCount> {
    let mut counts: HashMap<(Option<u16>, &str), usize> = HashMap::new();
    for failure in failures {
        *counts
            .entry((failure.status, failure.reason.as_str()))
            .or_default() += 1;
    }
    let mut summary: Vec<FailureCount> = counts
        .into_iter()
        .map(|((status, reason), count)| FailureCount {
            status,
            reason: reason.to_string(),
            count,
        })
        .collect();
    summary.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.status.cmp(&b.status))
            .then_with(|| a.reason.cmp(&b.reason))
    });
    summary
}

/// Outcome of a whole scrape run.
#[derive(Debug)]
pub struct ScrapeReport {
    /// Every sale record found, newest first.
    pub table: SalesTable,
    /// Requests that did not return `200 OK`, in request order.
    pub failures: Vec<FailedRequest>,
    /// Requests dispatched.
    pub requests: usize,
    /// Listings parsed successfully.
    pub listings: usize,
    /// Listings skipped because they were not in the expected format.
    pub skipped: usize,
}

impl ScrapeReport {
    pub fn failure_summary(&self) -> Vec<FailureCount> {
        summarize_failures(&self.failures)
    }
}

/// Reason recorded for a request whose task panicked or was cancelled.
pub const TASK_FAILED: &str = "Task Failed";

enum PageOutcome {
    Parsed(PageSales),
    Failed(FailedRequest),
}

/// Fetches search pages concurrently and turns them into a [`SalesTable`].
pub struct SalesScraper {
    client: Client,
    parser: Arc<ListingParser>,
    site: SiteConfig,
    max_concurrency: Option<usize>,
}

impl SalesScraper {
    /// Creates a scraper from run settings, with the default listing parser.
    pub fn new(config: &ScrapeConfig) -> Result<Self, SalesError> {
        let client = match config.timeout {
            Some(timeout) => Client::with_timeout(timeout)?,
            None => Client::new()?,
        };
        Ok(Self {
            client,
            parser: Arc::new(ListingParser::default()),
            site: config.site.clone(),
            max_concurrency: config.max_concurrency,
        })
    }

    /// Scrapes every history page of every suburb.
    ///
    /// Failed requests are tolerated and reported. Fails with
    /// [`SalesError::NoSales`] when no request produced a single record.
    pub async fn scrape<S>(&self, suburbs: &[S], state: &str) -> Result<ScrapeReport, SalesError>
    where
        S: AsRef<str>,
    {
        let urls: Vec<Url> = build_urls(suburbs, state, &self.site)?.collect();
        tracing::info!(
            suburbs = suburbs.len(),
            requests = urls.len(),
            "Fetching sold history for {}",
            state
        );
        self.scrape_urls(urls).await
    }

    /// Fetches the given search URLs and aggregates their records.
    ///
    /// Each URL must carry the `q` and `sta` parameters so its records can be
    /// attributed to a suburb and state.
    pub async fn scrape_urls<I>(&self, urls: I) -> Result<ScrapeReport, SalesError>
    where
        I: IntoIterator<Item = Url>,
    {
        let semaphore = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))));
        let mut join_set = JoinSet::new();
        let mut urls_sent = Vec::new();

        for (idx, url) in urls.into_iter().enumerate() {
            urls_sent.push(url.clone());
            let client = self.client.clone();
            let parser = Arc::clone(&self.parser);
            let semaphore = semaphore.clone();

            join_set.spawn(async move {
                let _permit = match semaphore {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };
                (idx, fetch_page(&client, parser, url).await)
            });
        }
        let requests = urls_sent.len();

        let mut outcomes: Vec<Option<PageOutcome>> = (0..requests).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, outcome)) => outcomes[idx] = Some(outcome),
                Err(e) => tracing::error!("Fetch task did not complete: {}", e),
            }
        }

        let PageTally {
            records,
            failures,
            listings,
            skipped,
        } = tally(outcomes, urls_sent);

        let summary = summarize_failures(&failures);
        if !failures.is_empty() {
            tracing::warn!("{} of {} requests failed", failures.len(), requests);
            for entry in &summary {
                tracing::warn!(
                    status = %entry.status_label(),
                    reason = %entry.reason,
                    count = entry.count,
                    "Failed requests"
                );
            }
        }

        if records.is_empty() {
            return Err(SalesError::NoSales {
                requests,
                failed: failures.len(),
                summary,
            });
        }

        tracing::info!(
            records = records.len(),
            listings,
            skipped,
            "Scraped {} pages",
            requests - failures.len()
        );

        Ok(ScrapeReport {
            table: SalesTable::new(records),
            failures,
            requests,
            listings,
            skipped,
        })
    }
}

#[derive(Default)]
struct PageTally {
    records: Vec<SaleRecord>,
    failures: Vec<FailedRequest>,
    listings: usize,
    skipped: usize,
}

/// Merges per-request outcomes in request order. A request with no outcome
/// (its task panicked or was cancelled) counts as a failed request.
fn tally(outcomes: Vec<Option<PageOutcome>>, urls: Vec<Url>) -> PageTally {
    let mut tally = PageTally::default();
    for (outcome, url) in outcomes.into_iter().zip(urls) {
        let outcome = outcome.unwrap_or_else(|| {
            PageOutcome::Failed(FailedRequest {
                url,
                status: None,
                reason: TASK_FAILED.to_string(),
            })
        });
        match outcome {
            PageOutcome::Parsed(page) => {
                tally.listings += page.listings;
                tally.skipped += page.skipped;
                tally.records.extend(page.records);
            }
            PageOutcome::Failed(failure) => tally.failures.push(failure),
        }
    }
    tally
}

/// Scrapes `suburbs` in `state` with settings from the environment.
pub async fn scrape_sales<S>(suburbs: &[S], state: &str) -> Result<ScrapeReport, SalesError>
where
    S: AsRef<str>,
{
    SalesScraper::new(&ScrapeConfig::from_env())?
        .scrape(suburbs, state)
        .await
}

async fn fetch_page(client: &Client, parser: Arc<ListingParser>, url: Url) -> PageOutcome {
    let page = match client.fetch(url.clone()).await {
        Ok(page) => page,
        Err(Error::RequestFailed { reason }) => {
            return PageOutcome::Failed(FailedRequest {
                url,
                status: None,
                reason,
            })
        }
        Err(e) => {
            return PageOutcome::Failed(FailedRequest {
                url,
                status: None,
                reason: e.to_string(),
            })
        }
    };

    if !page.is_ok() {
        return PageOutcome::Failed(FailedRequest {
            status: Some(page.status.as_u16()),
            reason: page.reason().to_string(),
            url: page.url,
        });
    }

    let Some(context) = SearchQuery::from_url(&page.url) else {
        tracing::warn!("No suburb/state in {}, ignoring page", page.url);
        return PageOutcome::Parsed(PageSales::default());
    };

    // Pages can be large; parse them off the runtime's worker threads.
    let body = page.body;
    let suburb = context.suburb.clone();
    let state = context.state.clone();
    let parsed =
        tokio::task::spawn_blocking(move || parser.parse_page(&body, &suburb, &state)).await;
    let sales = match parsed {
        Ok(sales) => sales,
        Err(e) => {
            tracing::error!("Parsing {} did not complete: {}", page.url, e);
            return PageOutcome::Failed(FailedRequest {
                url: page.url,
                status: None,
                reason: TASK_FAILED.to_string(),
            });
        }
    };

    tracing::debug!(
        suburb = %context.suburb,
        page = context.common.page,
        records = sales.records.len(),
        "Parsed results page"
    );
    PageOutcome::Parsed(sales)
}
