//! Core data types for the Google SERP scraping client.

use serde::{Deserialize, Serialize};

/// A single deduplicated search result.
///
/// `title` and `description` are only populated when the session runs with
/// verbose output enabled; otherwise the result is effectively a ranked URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// 1-based position of first discovery, strictly increasing.
    pub rank: usize,

    /// Normalized absolute URL of the result.
    pub url: String,

    /// Visible anchor text (verbose output only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sibling text block next to the anchor (verbose output only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Outcome of a search session.
///
/// The rate-limited variant replaces the string sentinel older scrapers
/// append to their result list: it carries whatever was accumulated before
/// the server started throttling, and the caller decides how to proceed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// The result budget was reached or the results were exhausted.
    Complete(Vec<SearchResult>),

    /// The server answered HTTP 429 and the session is not configured to
    /// manage throttling itself. Contains the partial results collected
    /// before the rate limit was hit.
    RateLimited(Vec<SearchResult>),
}

impl SearchOutcome {
    /// Accumulated results, regardless of how the session ended.
    pub fn results(&self) -> &[SearchResult] {
        match self {
            SearchOutcome::Complete(results) | SearchOutcome::RateLimited(results) => results,
        }
    }

    /// Consumes the outcome and returns the accumulated results.
    pub fn into_results(self) -> Vec<SearchResult> {
        match self {
            SearchOutcome::Complete(results) | SearchOutcome::RateLimited(results) => results,
        }
    }

    /// True if the session ended because of server-side throttling.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SearchOutcome::RateLimited(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_result_serializes_without_metadata() {
        let result = SearchResult {
            rank: 1,
            url: "https://example.com/page".to_string(),
            title: None,
            description: None,
        };

        let json = serde_json::to_string(&result).expect("serialization should succeed");
        assert_eq!(json, r#"{"rank":1,"url":"https://example.com/page"}"#);
    }

    #[test]
    fn test_verbose_result_round_trips() {
        let result = SearchResult {
            rank: 3,
            url: "https://example.com/docs".to_string(),
            title: Some("Example Docs".to_string()),
            description: Some("Documentation for example.com".to_string()),
        };

        let json = serde_json::to_string(&result).expect("serialization should succeed");
        let back: SearchResult =
            serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(result, back);
    }

    #[test]
    fn test_outcome_accessors() {
        let results = vec![SearchResult {
            rank: 1,
            url: "https://example.com/".to_string(),
            title: None,
            description: None,
        }];

        let complete = SearchOutcome::Complete(results.clone());
        assert!(!complete.is_rate_limited());
        assert_eq!(complete.results().len(), 1);

        let limited = SearchOutcome::RateLimited(results);
        assert!(limited.is_rate_limited());
        assert_eq!(limited.into_results().len(), 1);
    }
}
