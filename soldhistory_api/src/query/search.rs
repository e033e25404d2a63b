//! Sold-history search query and the suburb × page URL builder.

use url::Url;

use super::common::{Query, QueryCommon};
use crate::{Error, SiteConfig};

/// One sold-history search: a suburb in a state, at one history page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub common: QueryCommon,
    pub suburb: String,
    /// State code as given. Sent lower-cased.
    pub state: String,
}

impl Query for SearchQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("q", &self.suburb)
            .append_pair("sta", &self.state.to_lowercase());
        self.common.add_to_url(&url)
    }
}

impl SearchQuery {
    pub fn with_suburb(mut self, suburb: &str) -> Self {
        self.suburb = suburb.to_string();
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = state.to_string();
        self
    }

    /// Recovers the search context from a URL built by [`SearchQuery::add_to_url`].
    ///
    /// The state comes back upper-cased. Returns `None` when the suburb or
    /// state parameter is missing.
    pub fn from_url(url: &Url) -> Option<Self> {
        let mut query = SearchQuery::default();
        let mut suburb = None;
        let mut state = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "q" => suburb = Some(value.into_owned()),
                "sta" => state = Some(value.to_uppercase()),
                "p" => query.common.page = value.parse().unwrap_or_default(),
                "s" => query.common.sort = value.parse().unwrap_or(query.common.sort),
                "count" => query.common.count = value.parse().ok(),
                _ => {}
            }
        }
        query.suburb = suburb?;
        query.state = state?;
        Some(query)
    }
}

/// Builds one search URL per `(suburb, page)` pair, suburbs in input order and
/// pages `0..site.max_pages`.
///
/// The base URL is parsed up front; the URLs themselves are produced lazily.
/// Suburb names are passed through untouched.
pub fn build_urls<'a, S>(
    suburbs: &'a [S],
    state: &'a str,
    site: &'a SiteConfig,
) -> Result<impl Iterator<Item = Url> + 'a, Error>
where
    S: AsRef<str>,
{
    let base = Url::parse(&site.base_url)?;
    Ok(suburbs.iter().flat_map(move |suburb| {
        let base = base.clone();
        (0..site.max_pages).map(move |page| {
            SearchQuery::default()
                .with_suburb(suburb.as_ref())
                .with_state(state)
                .with_page(page)
                .with_sort(site.sort)
                .with_count(site.count)
                .add_to_url(&base)
        })
    }))
}
