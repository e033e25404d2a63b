//! Fixed parameters of the sold-history search endpoint.

/// Search endpoint on house.speakingsame.com.
pub const DEFAULT_BASE_URL: &str = "http://house.speakingsame.com/p.php";

/// Number of historical result pages the site serves per suburb.
pub const MAX_HISTORY_PAGES: u32 = 30;

/// Value of the `s` flag the site expects for sold-history searches.
pub const DEFAULT_SORT_FLAG: u8 = 1;

/// Page size large enough that the site returns every result on one page.
pub const DEFAULT_RESULT_COUNT: u64 = 9_999_999_999;

/// Endpoint settings used when building search URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    /// Search endpoint. Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Pages requested per suburb (`0..max_pages`). Defaults to 30.
    pub max_pages: u32,
    /// Sort flag sent as `s`.
    pub sort: u8,
    /// Results per page sent as `count`.
    pub count: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_pages: MAX_HISTORY_PAGES,
            sort: DEFAULT_SORT_FLAG,
            count: DEFAULT_RESULT_COUNT,
        }
    }
}

impl SiteConfig {
    /// Default settings pointed at a different endpoint. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Overrides the number of pages requested per suburb.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}
