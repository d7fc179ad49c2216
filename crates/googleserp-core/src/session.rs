//! Search session orchestration.
//!
//! Drives the whole search: warm-up fetch for baseline cookies, then a
//! strictly sequential fetch → parse → filter → accumulate loop that
//! paginates until the result budget is met, the results are exhausted,
//! the page cap is hit, or the server rate-limits an unmanaged session.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use rand::Rng;

use crate::client::{PageClient, PageResponse};
use crate::config::{RESERVED_PARAMS, SearchConfig};
use crate::error::{Result, SerpError};
use crate::filter::filter_search_result_url;
use crate::parser::parse_result_anchors;
use crate::types::{SearchOutcome, SearchResult};
use crate::url::{build_home_url, build_search_url};

/// Mutable per-search state, threaded through each step of the loop so the
/// session itself stays immutable between searches.
#[derive(Debug)]
pub(crate) struct SessionState {
    /// Cookie jar replayed on every request and updated from responses.
    pub(crate) cookies: BTreeMap<String, String>,

    /// Current rate-limit cool-off period.
    pub(crate) cool_off: Duration,

    /// Result offset the next page is requested at.
    pub(crate) start: u32,

    /// Deduplicated results in rank order.
    pub(crate) results: Vec<SearchResult>,

    /// URLs already accepted, for duplicate detection.
    pub(crate) seen: HashSet<String>,
}

impl SessionState {
    fn new(config: &SearchConfig) -> Self {
        let mut cookies = BTreeMap::new();
        if let Some(exemption) = &config.abuse_exemption {
            cookies.insert("GOOGLE_ABUSE_EXEMPTION".to_string(), exemption.clone());
        }

        Self {
            cookies,
            cool_off: Duration::from_secs_f64(config.initial_cool_off_mins.max(0.0) * 60.0),
            start: config.start,
            results: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Multiplies the cool-off period by `factor`, rounded to two decimal
    /// minutes.
    pub(crate) fn grow_cool_off(&mut self, factor: f64) {
        let minutes = self.cool_off.as_secs_f64() / 60.0;
        let grown = (minutes * factor * 100.0).round() / 100.0;
        tracing::info!(
            factor,
            from_minutes = minutes,
            to_minutes = grown,
            "increasing rate-limit cool-off period"
        );
        self.cool_off = Duration::from_secs_f64(grown * 60.0);
    }
}

/// A configured search against Google's HTML result pages.
///
/// # Example
/// ```no_run
/// use googleserp_core::{Result, SearchConfig, SearchSession};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let config = SearchConfig {
///         max_results: 25,
///         ..SearchConfig::new("rust html scraping")
///     };
///     let session = SearchSession::new(config)?;
///
///     for result in session.search().await?.results() {
///         println!("{:>3}. {}", result.rank, result.url);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct SearchSession {
    config: SearchConfig,
    client: PageClient,
}

impl SearchSession {
    /// Validates `config` and builds the HTTP client.
    ///
    /// Fails with [`SerpError::Config`] when an extra GET parameter collides
    /// with one of the built-in parameter names — before any network
    /// activity. Out-of-range values are clamped with a warning: `num` above
    /// 100 (Google's cap), and a result budget above ~400 draws a warning
    /// because the provider rarely yields more.
    pub fn new(mut config: SearchConfig) -> Result<Self> {
        config.lang_result = config.lang_result.to_lowercase();

        if config.num > 100 {
            tracing::warn!(
                num = config.num,
                "the largest per-page result count the server allows is 100, clamping"
            );
            config.num = 100;
        }

        if config.max_results > 400 {
            tracing::warn!(
                budget = config.max_results,
                "searches are usually only able to retrieve a maximum of ~400 results"
            );
        }

        for name in RESERVED_PARAMS {
            if config.extra_params.contains_key(name) {
                return Err(SerpError::Config(format!(
                    "extra GET parameter {name:?} collides with a built-in parameter"
                )));
            }
        }

        let client = PageClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Effective configuration after validation and clamping.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the search and returns the deduplicated, rank-ordered results.
    ///
    /// Ends with [`SearchOutcome::Complete`] when the budget is reached or a
    /// page yields no new links (the sole exhaustion signal — the provider
    /// has no explicit last-page marker), and with
    /// [`SearchOutcome::RateLimited`] when an unmanaged session hits
    /// HTTP 429; the latter carries the partial results collected so far.
    pub async fn search(&self) -> Result<SearchOutcome> {
        let mut state = SessionState::new(&self.config);

        // Browse the home page first, solely to pick up baseline cookies.
        match self
            .client
            .fetch_page(&build_home_url(&self.config), &mut state)
            .await?
        {
            PageResponse::Content(_) => {}
            PageResponse::RateLimited => {
                return Ok(SearchOutcome::RateLimited(state.results));
            }
        }

        let mut pages_fetched = 0u32;

        while state.results.len() < self.config.max_results {
            if pages_fetched >= self.config.max_pages {
                tracing::warn!(
                    pages = pages_fetched,
                    "page cap reached before the result budget, stopping"
                );
                break;
            }

            tracing::info!(
                start = state.start,
                num = self.config.num,
                found = state.results.len(),
                budget = self.config.max_results,
                "requesting results page"
            );

            let url = build_search_url(&self.config, state.start);
            let html = match self.client.fetch_page(&url, &mut state).await? {
                PageResponse::Content(html) => html,
                PageResponse::RateLimited => {
                    return Ok(SearchOutcome::RateLimited(state.results));
                }
            };
            pages_fetched += 1;

            let anchors = parse_result_anchors(&html, self.config.verbose)?;

            let mut new_links_on_page = 0usize;

            for anchor in anchors {
                let Some(link) = filter_search_result_url(&anchor.href) else {
                    continue;
                };

                if !state.seen.insert(link.clone()) {
                    tracing::info!(link = %link, "duplicate URL found");
                    continue;
                }

                new_links_on_page += 1;
                let rank = state.results.len() + 1;
                tracing::info!(rank, link = %link, "found unique URL");

                let (title, description) = if self.config.verbose {
                    (
                        Some(anchor.title.trim().to_string()),
                        Some(anchor.description.trim().to_string()),
                    )
                } else {
                    (None, None)
                };

                state.results.push(SearchResult {
                    rank,
                    url: link,
                    title,
                    description,
                });

                if state.results.len() >= self.config.max_results {
                    return Ok(SearchOutcome::Complete(state.results));
                }
            }

            // No explicit "next page" marker exists; a page without any new
            // valid link means the results are exhausted.
            if new_links_on_page == 0 {
                tracing::info!("no new results on this page, search exhausted");
                return Ok(SearchOutcome::Complete(state.results));
            }

            state.start += self.config.num;

            if self.config.min_page_delay_secs > 0 {
                let delay = self.config.min_page_delay_secs + rand::thread_rng().gen_range(0..11);
                tracing::info!(delay, "sleeping until retrieving the next page of results");
                tokio::time::sleep(Duration::from_secs(delay)).await;
            }
        }

        Ok(SearchOutcome::Complete(state.results))
    }
}
