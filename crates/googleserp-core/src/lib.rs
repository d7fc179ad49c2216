//! Google SERP Scraping Client
//!
//! Issues paginated queries against Google's HTML search result pages and
//! assembles a deduplicated, rank-ordered list of result links, coping with
//! rate-limiting responses and EU consent-wall cookies along the way.
//!
//! # Overview
//!
//! A [`SearchSession`] owns the configuration, builds the paginated search
//! URLs, fetches pages sequentially with cookie and consent handling,
//! parses result anchors, filters junk and self-referential links, and
//! paginates until a result budget or exhaustion condition is met:
//! - deterministic search URL construction, with caller-supplied extra
//!   parameters validated against the built-in ones
//! - bounded self-managed HTTP 429 backoff, or a typed rate-limit outcome
//!   for callers that manage throttling themselves
//! - randomized inter-page pacing to look less like an automated client
//!
//! # Example
//!
//! ```no_run
//! use googleserp_core::{Result, SearchConfig, SearchSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SearchConfig {
//!         max_results: 25,
//!         verbose: true,
//!         ..SearchConfig::new("rust web scraping")
//!     };
//!
//!     let session = SearchSession::new(config)?;
//!     let outcome = session.search().await?;
//!
//!     if outcome.is_rate_limited() {
//!         eprintln!("rate limited; partial results below");
//!     }
//!     for result in outcome.results() {
//!         println!("{:>3}. {}", result.rank, result.url);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Rate limiting
//!
//! Google throttles aggressive clients with HTTP 429. By default the
//! session sleeps out a growing cool-off period and retries a bounded
//! number of times before giving up with
//! [`SerpError::RateLimitExhausted`]. With
//! [`SearchConfig::manage_rate_limits`] disabled, a 429 instead ends the
//! search with [`SearchOutcome::RateLimited`] carrying the partial results.
//!
//! Log output uses `tracing`; install a subscriber to see it.

mod client;
mod config;
mod error;
mod filter;
pub mod parser;
mod session;
mod types;
pub mod url;

// Re-export configuration types
pub use config::{DEFAULT_USER_AGENT, RESERVED_PARAMS, SearchConfig};

// Re-export error types
pub use error::{Result, SerpError};

// Re-export the link filter
pub use filter::filter_search_result_url;

// Re-export parser types
pub use parser::{RawAnchor, parse_result_anchors};

// Re-export the main session API
pub use session::SearchSession;

// Re-export result types
pub use types::{SearchOutcome, SearchResult};

// Re-export URL helper functions for convenience
pub use url::{build_home_url, build_search_url, date_range_tbs};
