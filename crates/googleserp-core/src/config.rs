//! Search session configuration.

use std::collections::BTreeMap;

/// GET parameter names the URL builder composes itself. Caller-supplied
/// extra parameters must not reuse any of these.
pub const RESERVED_PARAMS: [&str; 9] = [
    "btnG", "cr", "hl", "num", "q", "safe", "start", "tbs", "lr",
];

/// Default browser User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for a [`SearchSession`](crate::SearchSession).
///
/// Immutable once the session is constructed. Values outside Google's
/// accepted ranges are clamped with a warning at construction time.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Query string. Must NOT be url-encoded; the URL builder encodes it.
    pub query: String,

    /// Top level domain of the search endpoint (e.g. "com", "de").
    pub tld: String,

    /// HTML user interface language (`hl` parameter).
    pub lang_ui: String,

    /// Search result language (`lr` parameter), e.g. "lang_en".
    /// Lowercased at session construction.
    pub lang_result: String,

    /// Verbatim search or time limit filter (`tbs` parameter), e.g.
    /// "qdr:h" for the last hour. See [`date_range_tbs`](crate::url::date_range_tbs)
    /// for custom date ranges.
    pub tbs: String,

    /// Safe search mode (`safe` parameter), "off" or "active".
    pub safe: String,

    /// Result offset of the first page (`start` parameter).
    pub start: u32,

    /// Results requested per page (`num` parameter). Google caps this at
    /// 100; larger values are clamped with a warning.
    pub num: u32,

    /// Country or region to focus the search on (`cr` parameter).
    pub country: String,

    /// Extra GET parameters appended verbatim to every search URL. Keys and
    /// values must already be url-encoded by the caller. Keys colliding with
    /// [`RESERVED_PARAMS`] fail session construction.
    pub extra_params: BTreeMap<String, String>,

    /// Maximum number of deduplicated results to return for the whole
    /// search. Google rarely yields more than ~400; larger budgets draw a
    /// warning.
    pub max_results: usize,

    /// Hard cap on result pages fetched per search, so a response stream
    /// that keeps yielding "new" links cannot loop the session forever.
    pub max_pages: u32,

    /// Minimum delay between paged requests, in seconds. The actual delay
    /// is uniform over `[floor, floor + 10]` to look less automated. A
    /// floor of zero disables inter-page pacing entirely.
    pub min_page_delay_secs: u64,

    /// User-Agent header for all requests.
    pub user_agent: String,

    /// If true, the session sleeps and retries on HTTP 429 itself (up to
    /// [`max_rate_limit_retries`](Self::max_rate_limit_retries)); if false,
    /// a 429 ends the search with a rate-limited outcome.
    pub manage_rate_limits: bool,

    /// Initial cool-off period after an HTTP 429, in minutes.
    pub initial_cool_off_mins: f64,

    /// Factor the cool-off period grows by on each 429 detected.
    pub cool_off_factor: f64,

    /// Maximum number of self-managed 429 retries before giving up with
    /// [`SerpError::RateLimitExhausted`](crate::SerpError::RateLimitExhausted).
    pub max_rate_limit_retries: u32,

    /// HTTP(S) or SOCKS5 proxy URL.
    pub proxy: Option<String>,

    /// Verify TLS certificates. Disable only for intercepting HTTPS proxies.
    pub verify_tls: bool,

    /// If true, results carry rank, title and description; otherwise only
    /// ranked URLs.
    pub verbose: bool,

    /// Pre-supplied `GOOGLE_ABUSE_EXEMPTION` cookie value, seeded into the
    /// session cookie jar before the first request.
    pub abuse_exemption: Option<String>,

    /// Override for the search endpoint base URL, e.g. a local mock server.
    /// `None` means `https://www.google.{tld}`.
    pub base_url: Option<String>,
}

impl SearchConfig {
    /// Configuration for `query` with default settings for everything else.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            tld: "com".to_string(),
            lang_ui: "en".to_string(),
            lang_result: "lang_en".to_string(),
            tbs: "0".to_string(),
            safe: "off".to_string(),
            start: 0,
            num: 10,
            country: String::new(),
            extra_params: BTreeMap::new(),
            max_results: 100,
            max_pages: 100,
            min_page_delay_secs: 7,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            manage_rate_limits: true,
            initial_cool_off_mins: 60.0,
            cool_off_factor: 1.1,
            max_rate_limit_retries: 3,
            proxy: None,
            verify_tls: true,
            verbose: false,
            abuse_exemption: None,
            base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.tld, "com");
        assert_eq!(config.num, 10);
        assert_eq!(config.max_results, 100);
        assert_eq!(config.min_page_delay_secs, 7);
        assert!(config.manage_rate_limits);
        assert!(config.verify_tls);
        assert!(!config.verbose);
    }

    #[test]
    fn test_new_sets_query() {
        let config = SearchConfig::new("rust programming");
        assert_eq!(config.query, "rust programming");
        assert_eq!(config.tld, "com");
    }

    #[test]
    fn test_reserved_params_match_url_builder() {
        for name in ["q", "num", "start", "hl", "lr", "tbs", "safe", "cr", "btnG"] {
            assert!(RESERVED_PARAMS.contains(&name));
        }
    }
}
