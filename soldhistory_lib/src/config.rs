//! Run settings, read from the environment with code defaults.

use std::str::FromStr;
use std::time::Duration;

use soldhistory_api::SiteConfig;

/// Settings for one scrape run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// Endpoint, page count, sort flag and result count.
    pub site: SiteConfig,
    /// Upper bound on in-flight requests. `None` dispatches every request at once.
    pub max_concurrency: Option<usize>,
    /// Per-request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl ScrapeConfig {
    /// Reads `SOLDHISTORY_BASE_URL`, `SOLDHISTORY_MAX_PAGES`,
    /// `SOLDHISTORY_CONCURRENCY` and `SOLDHISTORY_TIMEOUT_SECS`.
    ///
    /// Unset or unparseable values fall back to the defaults. A concurrency
    /// or timeout of 0 means "no limit".
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut site = SiteConfig::default();
        if let Some(base_url) = lookup("SOLDHISTORY_BASE_URL").filter(|v| !v.trim().is_empty()) {
            site.base_url = base_url.trim().to_string();
        }
        site.max_pages = env_parse(&lookup, "SOLDHISTORY_MAX_PAGES").unwrap_or(site.max_pages);

        Self {
            site,
            max_concurrency: env_parse::<usize, _>(&lookup, "SOLDHISTORY_CONCURRENCY")
                .filter(|n| *n > 0),
            timeout: env_parse::<u64, _>(&lookup, "SOLDHISTORY_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

fn env_parse<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|val| val.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ScrapeConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ScrapeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config, ScrapeConfig::default());
        assert_eq!(config.site.max_pages, 30);
        assert_eq!(config.max_concurrency, None);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("SOLDHISTORY_BASE_URL", "http://localhost:8080/p.php"),
            ("SOLDHISTORY_MAX_PAGES", "5"),
            ("SOLDHISTORY_CONCURRENCY", "8"),
            ("SOLDHISTORY_TIMEOUT_SECS", "20"),
        ]);
        assert_eq!(config.site.base_url, "http://localhost:8080/p.php");
        assert_eq!(config.site.max_pages, 5);
        assert_eq!(config.max_concurrency, Some(8));
        assert_eq!(config.timeout, Some(Duration::from_secs(20)));
    }

    #[test]
    fn zero_means_unlimited() {
        let config = config_from(&[
            ("SOLDHISTORY_CONCURRENCY", "0"),
            ("SOLDHISTORY_TIMEOUT_SECS", "0"),
        ]);
        assert_eq!(config.max_concurrency, None);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let config = config_from(&[
            ("SOLDHISTORY_BASE_URL", "   "),
            ("SOLDHISTORY_MAX_PAGES", "many"),
            ("SOLDHISTORY_CONCURRENCY", "-3"),
        ]);
        assert_eq!(config.site.base_url, SiteConfig::default().base_url);
        assert_eq!(config.site.max_pages, 30);
        assert_eq!(config.max_concurrency, None);
    }
}
