//! Result link filtering.
//!
//! Google result pages mix organic result anchors with navigation, account
//! and image-search links, and often wrap the real destination in a
//! redirector href. This module normalizes a raw href into an absolute URL
//! or rejects it.

use url::Url;

const REDIRECTOR_BASE: &str = "http://www.google.com";

/// Filters a raw href found on a result page.
///
/// Returns the normalized absolute URL, or `None` for links that are not
/// valid results: relative links without a host, anything that fails to
/// parse, and links pointing back at a Google property (images.google.com,
/// googleusercontent.com, ...).
///
/// Redirector hrefs (`/url?...` or the fully-qualified
/// `http://www.google.com/url?...` form that shows up intermittently) are
/// unwrapped first: the destination is taken from the `q` query parameter,
/// or from `url` when `q` is absent.
///
/// Known limitation: because the own-domain check is a substring match on
/// the host, legitimate results for queries like `site:google.com fiber`
/// are rejected too. This mirrors long-standing behavior and stays until
/// there is a product decision to change it.
pub fn filter_search_result_url(href: &str) -> Option<String> {
    tracing::debug!(href, "pre-filter link");

    let link = if href.starts_with("/url?") || href.starts_with("http://www.google.com/url?") {
        extract_redirector_target(href)?
    } else {
        href.to_string()
    };

    // Protocol-relative hrefs carry a host; give them a scheme so the
    // parser agrees.
    let parsed = if let Some(rest) = link.strip_prefix("//") {
        Url::parse(&format!("http://{rest}")).ok()?
    } else {
        Url::parse(&link).ok()?
    };

    let host = match parsed.host_str() {
        Some(host) => host.to_ascii_lowercase(),
        None => {
            tracing::debug!(link = %link, "excluding URL without a host");
            return None;
        }
    };

    if host.contains("google") {
        tracing::debug!(link = %link, "excluding URL pointing at a google property");
        return None;
    }

    tracing::debug!(link = %link, "post-filter link");
    Some(link)
}

/// Pulls the true destination out of a redirector href.
fn extract_redirector_target(href: &str) -> Option<String> {
    let base = Url::parse(REDIRECTOR_BASE).ok()?;
    let wrapped = base.join(href).ok()?;

    // The "q" key exists most of the time; once in a while only "url" does.
    wrapped
        .query_pairs()
        .find(|(key, value)| key == "q" && !value.is_empty())
        .or_else(|| {
            wrapped
                .query_pairs()
                .find(|(key, value)| key == "url" && !value.is_empty())
        })
        .map(|(_, value)| value.into_owned())
}
