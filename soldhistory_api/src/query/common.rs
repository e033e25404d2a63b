//! Shared query infrastructure: the [`Query`] trait and [`QueryCommon`] fields.

use url::Url;

use crate::config::DEFAULT_SORT_FLAG;

/// Trait implemented by query builders. Provides URL serialization and
/// shared builder methods for paging, sort flag and result count.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the history page number (0-indexed).
    fn with_page(mut self, page: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().page = page;
        self
    }

    /// Sets the sort flag sent as `s`.
    fn with_sort(mut self, sort: u8) -> Self
    where
        Self: Sized,
    {
        self.get_common().sort = sort;
        self
    }

    /// Sets the number of results requested per page.
    fn with_count(mut self, count: u64) -> Self
    where
        Self: Sized,
    {
        self.get_common().count = Some(count);
        self
    }
}

/// Paging fields shared by all queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryCommon {
    /// Page number (0-indexed). Defaults to 0.
    pub page: u32,
    /// Sort flag. Defaults to 1.
    pub sort: u8,
    /// Results per page. `None` uses the site default.
    pub count: Option<u64>,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            page: 0,
            sort: DEFAULT_SORT_FLAG,
            count: None,
        }
    }
}

impl QueryCommon {
    /// Appends the paging parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("p", &self.page.to_string())
            .append_pair("s", &self.sort.to_string());
        if let Some(count) = self.count {
            url.query_pairs_mut()
                .append_pair("count", &count.to_string());
        };
        url
    }
}
