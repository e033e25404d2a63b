//! Library layer for sold-history scraping: listing extraction, concurrent
//! fetching, and the sorted sales table.
//!
//! Wraps the `soldhistory_api` crate, which builds the search URLs and
//! performs the HTTP requests.

pub mod config;
pub mod error;
pub mod fetch;
pub mod scrape;
pub mod table;
pub mod validation;

pub use soldhistory_api;
pub use soldhistory_api::types;
pub use soldhistory_api::{build_urls, Query, SearchQuery, SiteConfig};

pub use config::ScrapeConfig;
pub use error::SalesError;
pub use fetch::{
    scrape_sales, summarize_failures, FailedRequest, FailureCount, SalesScraper, ScrapeReport,
};
pub use scrape::{listing_fragments, ListingParser, PropertyListing, ScrapeError};
pub use table::SalesTable;
