//! Error types for the Google SERP scraping client.

use thiserror::Error;

/// Error type for all search session operations.
#[derive(Error, Debug)]
pub enum SerpError {
    /// Invalid configuration, detected before any network activity.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse HTML content.
    #[error("failed to parse HTML: {0}")]
    Parse(String),

    /// Self-managed rate-limit backoff gave up after the configured
    /// number of retries.
    #[error("rate limited by the server, gave up after {retries} retries")]
    RateLimitExhausted {
        /// Number of retries performed before giving up.
        retries: u32,
    },
}

/// Result type alias for search session operations.
pub type Result<T> = std::result::Result<T, SerpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let error = SerpError::Config("extra parameter \"num\" collides".to_string());
        assert_eq!(
            error.to_string(),
            "configuration error: extra parameter \"num\" collides"
        );
    }

    #[test]
    fn test_error_display_parse() {
        let error = SerpError::Parse("invalid selector".to_string());
        assert_eq!(error.to_string(), "failed to parse HTML: invalid selector");
    }

    #[test]
    fn test_error_display_rate_limit_exhausted() {
        let error = SerpError::RateLimitExhausted { retries: 3 };
        assert_eq!(
            error.to_string(),
            "rate limited by the server, gave up after 3 retries"
        );
    }
}
