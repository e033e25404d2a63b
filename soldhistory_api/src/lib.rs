mod client;
mod config;
mod errors;
mod query;
pub mod types;
mod user_agent;
pub use self::client::{Client, FetchedPage};
pub use self::config::{SiteConfig, MAX_HISTORY_PAGES};
pub use self::errors::Error;
pub use self::query::{build_urls, Query, QueryCommon, SearchQuery};
