//! Page fetching.
//!
//! One HTTP GET at a time with a fixed User-Agent, the session's current
//! cookies, and the configured proxy/TLS settings. Cookies are managed
//! explicitly in [`SessionState`] rather than through a client-side jar,
//! because the EU consent workaround has to read and rewrite them.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{COOKIE, HeaderMap, SET_COOKIE, USER_AGENT};

use crate::config::SearchConfig;
use crate::error::{Result, SerpError};
use crate::session::SessionState;

/// Fixed per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Marker a consent cookie carries while terms have not been accepted.
const CONSENT_PENDING_MARKER: &str = "PENDING+";

/// One fetched page, or the throttling signal when the session does not
/// manage HTTP 429 responses itself.
#[derive(Debug)]
pub(crate) enum PageResponse {
    Content(String),
    RateLimited,
}

/// HTTP wrapper around `reqwest` carrying the session's fetch policy.
#[derive(Debug)]
pub(crate) struct PageClient {
    http: reqwest::Client,
    user_agent: String,
    manage_rate_limits: bool,
    cool_off_factor: f64,
    max_rate_limit_retries: u32,
}

impl PageClient {
    pub(crate) fn new(config: &SearchConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(!config.verify_tls);

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        Ok(Self {
            http: builder.build()?,
            user_agent: config.user_agent.clone(),
            manage_rate_limits: config.manage_rate_limits,
            cool_off_factor: config.cool_off_factor,
            max_rate_limit_retries: config.max_rate_limit_retries,
        })
    }

    /// Fetches `url`, updating the session cookies from the response.
    ///
    /// HTTP 200 returns the body. HTTP 429 either sleeps out the current
    /// cool-off and retries (self-managed mode, bounded by the configured
    /// retry count) or returns [`PageResponse::RateLimited`]. Any other
    /// status degrades to an empty body with a logged warning, which the
    /// pagination loop treats as a page without results.
    pub(crate) async fn fetch_page(
        &self,
        url: &str,
        state: &mut SessionState,
    ) -> Result<PageResponse> {
        let mut retries = 0u32;

        loop {
            tracing::info!(url, "requesting URL");

            let mut request = self.http.get(url).header(USER_AGENT, self.user_agent.as_str());
            if let Some(header) = cookie_header(&state.cookies) {
                request = request.header(COOKIE, header);
            }

            let response = request.send().await?;
            let status = response.status();
            tracing::debug!(%status, cookies = ?state.cookies, "response received");

            capture_cookies(response.headers(), &mut state.cookies);
            apply_consent_workaround(&mut state.cookies);

            if status == StatusCode::OK {
                return Ok(PageResponse::Content(response.text().await?));
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!(
                    "server is blocking this client for making too many requests in a \
                     specific time period"
                );

                if !self.manage_rate_limits {
                    tracing::info!("rate-limit self-management is disabled, giving control back");
                    return Ok(PageResponse::RateLimited);
                }

                if retries >= self.max_rate_limit_retries {
                    return Err(SerpError::RateLimitExhausted { retries });
                }

                let minutes = state.cool_off.as_secs_f64() / 60.0;
                tracing::info!(minutes, "cooling off before retrying");
                tokio::time::sleep(state.cool_off).await;
                state.grow_cool_off(self.cool_off_factor);
                retries += 1;
                continue;
            }

            tracing::warn!(%status, "unexpected HTTP response, treating page as empty");
            return Ok(PageResponse::Content(String::new()));
        }
    }
}

/// Renders the session cookies as a `Cookie` header value, `None` when the
/// jar is empty.
fn cookie_header(cookies: &BTreeMap<String, String>) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    Some(
        cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Folds `Set-Cookie` response headers into the session cookie jar.
/// Attributes after the first `;` are dropped; only name and value matter
/// for replaying cookies within one session.
fn capture_cookies(headers: &HeaderMap, cookies: &mut BTreeMap<String, String>) {
    for header in headers.get_all(SET_COOKIE) {
        if let Ok(raw) = header.to_str()
            && let Some((name, rest)) = raw.split_once('=')
        {
            let value = rest.split(';').next().unwrap_or("");
            cookies.insert(name.trim().to_string(), value.trim().to_string());
        }
    }
}

/// Consent-wall workaround for requests sourcing from EU IP addresses.
///
/// The server hands those clients a `CONSENT=PENDING+<token>` cookie and an
/// interstitial instead of results. Replacing it with an accepted-consent
/// value that reuses the token unblocks the session.
fn apply_consent_workaround(cookies: &mut BTreeMap<String, String>) {
    let Some(consent) = cookies.get("CONSENT") else {
        return;
    };
    if !consent.starts_with(CONSENT_PENDING_MARKER) {
        return;
    }

    tracing::warn!(
        "this IP address appears to source from a European Union location, \
         rewriting the pending consent cookie to work around the interstitial"
    );

    let token = consent.split('+').nth(1).unwrap_or("").to_string();
    let accepted = format!("YES+shp.gws-20211108-0-RC1.fr+F+{token}");
    tracing::info!(cookie = %accepted, "updating consent cookie");
    cookies.insert("CONSENT".to_string(), accepted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_client_creation_with_defaults() {
        let client = PageClient::new(&SearchConfig::new("rust"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_creation_with_proxy() {
        let config = SearchConfig {
            proxy: Some("socks5://127.0.0.1:1080".to_string()),
            verify_tls: false,
            ..SearchConfig::new("rust")
        };
        assert!(PageClient::new(&config).is_ok());
    }

    #[test]
    fn test_cookie_header_empty_jar() {
        assert_eq!(cookie_header(&BTreeMap::new()), None);
    }

    #[test]
    fn test_cookie_header_joins_in_name_order() {
        let mut cookies = BTreeMap::new();
        cookies.insert("NID".to_string(), "abc".to_string());
        cookies.insert("CONSENT".to_string(), "YES+x".to_string());
        assert_eq!(
            cookie_header(&cookies),
            Some("CONSENT=YES+x; NID=abc".to_string())
        );
    }

    #[test]
    fn test_capture_cookies_strips_attributes() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("NID=511=abc; expires=Thu, 01-Jan-2026; Path=/; HttpOnly"),
        );
        headers.append(SET_COOKIE, HeaderValue::from_static("1P_JAR=2026-01-01"));

        let mut cookies = BTreeMap::new();
        capture_cookies(&headers, &mut cookies);

        assert_eq!(cookies.get("NID").map(String::as_str), Some("511=abc"));
        assert_eq!(cookies.get("1P_JAR").map(String::as_str), Some("2026-01-01"));
    }

    #[test]
    fn test_capture_cookies_overwrites_previous_value() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("NID=new"));

        let mut cookies = BTreeMap::new();
        cookies.insert("NID".to_string(), "old".to_string());
        capture_cookies(&headers, &mut cookies);

        assert_eq!(cookies.get("NID").map(String::as_str), Some("new"));
    }

    #[test]
    fn test_consent_workaround_rewrites_pending_cookie() {
        let mut cookies = BTreeMap::new();
        cookies.insert("CONSENT".to_string(), "PENDING+987".to_string());
        apply_consent_workaround(&mut cookies);
        assert_eq!(
            cookies.get("CONSENT").map(String::as_str),
            Some("YES+shp.gws-20211108-0-RC1.fr+F+987")
        );
    }

    #[test]
    fn test_consent_workaround_leaves_accepted_cookie_alone() {
        let mut cookies = BTreeMap::new();
        cookies.insert("CONSENT".to_string(), "YES+shp.gws-20211108-0-RC1.fr+F+1".to_string());
        apply_consent_workaround(&mut cookies);
        assert_eq!(
            cookies.get("CONSENT").map(String::as_str),
            Some("YES+shp.gws-20211108-0-RC1.fr+F+1")
        );
    }

    #[test]
    fn test_consent_workaround_without_consent_cookie() {
        let mut cookies = BTreeMap::new();
        cookies.insert("NID".to_string(), "abc".to_string());
        apply_consent_workaround(&mut cookies);
        assert_eq!(cookies.len(), 1);
    }
}
