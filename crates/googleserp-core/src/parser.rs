//! Result page parsing.
//!
//! Extracts the ordered sequence of anchors from a search results page.
//! Two strategies are tried in order: the main results container (the
//! element with id `search`), and — when the server-side response variant
//! omits it — a whole-document anchor scan that skips the `gbar` top
//! navigation. The fallback can pick up extraneous links; the link filter
//! downstream tolerates that.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, SerpError};

/// An anchor lifted from a results page, before filtering.
///
/// `title` and `description` are only extracted in verbose mode and degrade
/// to empty strings when the surrounding markup doesn't match expectations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnchor {
    /// Raw href attribute, possibly a redirector link.
    pub href: String,

    /// Visible anchor text.
    pub title: String,

    /// Text of the sibling block next to the anchor.
    pub description: String,
}

/// Parses a results page and returns its anchors in document order.
///
/// Anchors without an href are skipped with a warning. An empty page (or
/// one with no anchors at all) yields an empty vector, not an error.
pub fn parse_result_anchors(html: &str, verbose: bool) -> Result<Vec<RawAnchor>> {
    let document = Html::parse_document(html);

    let container_selector = selector("#search")?;
    let anchor_selector = selector("a")?;

    let mut anchors = Vec::new();

    if let Some(container) = document.select(&container_selector).next() {
        for element in container.select(&anchor_selector) {
            if let Some(anchor) = raw_anchor(&element, verbose) {
                anchors.push(anchor);
            }
        }
    } else {
        // Depending on the User-Agent there is no id "search" in the
        // response. Scan the whole document, minus the top bar.
        tracing::debug!("results container missing, scanning all document anchors");
        for element in document.select(&anchor_selector) {
            if is_inside_top_bar(&element) {
                continue;
            }
            if let Some(anchor) = raw_anchor(&element, verbose) {
                anchors.push(anchor);
            }
        }
    }

    Ok(anchors)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SerpError::Parse(format!("invalid selector {css:?}: {e:?}")))
}

fn raw_anchor(element: &ElementRef, verbose: bool) -> Option<RawAnchor> {
    let Some(href) = element.value().attr("href") else {
        tracing::warn!("anchor without an href attribute, skipping");
        return None;
    };

    let (title, description) = if verbose {
        (
            element.text().collect::<String>(),
            extract_description(element),
        )
    } else {
        (String::new(), String::new())
    };

    Some(RawAnchor {
        href: href.to_string(),
        title,
        description,
    })
}

fn is_inside_top_bar(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().attr("id") == Some("gbar"))
}

/// The description lives in a sibling block of the anchor: the second
/// child of the anchor's grandparent, or the third when the second is
/// empty (the page structure varies). Anything else degrades to "".
fn extract_description(anchor: &ElementRef) -> String {
    let Some(grandparent) = anchor.parent().and_then(|parent| parent.parent()) else {
        return String::new();
    };

    let mut first = String::new();
    for (index, child) in grandparent.children().enumerate() {
        let text = match ElementRef::wrap(child) {
            Some(element) => element.text().collect::<String>(),
            None => child
                .value()
                .as_text()
                .map(|text| text.to_string())
                .unwrap_or_default(),
        };
        match index {
            1 => first = text,
            2 => {
                if first.is_empty() {
                    return text;
                }
                break;
            }
            _ => {}
        }
    }
    first
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"<html><body>
        <div id="gbar"><a href="https://images.google.com/">Images</a></div>
        <div id="search"><div class="g"><div class="r"><a href="/url?q=https://example.com/one">Example One</a></div><div class="s">First description</div></div><div class="g"><div class="r"><a href="/url?q=https://example.com/two">Example Two</a></div><div class="s">Second description</div></div></div>
        </body></html>"#;

    const NO_CONTAINER_PAGE: &str = r#"<html><body>
        <div id="gbar"><a href="https://images.google.com/">Images</a><a href="https://maps.google.com/">Maps</a></div>
        <p><a href="/url?q=https://example.com/loose">Loose result</a></p>
        </body></html>"#;

    #[test]
    fn test_primary_container_scopes_the_scan() {
        let anchors = parse_result_anchors(RESULTS_PAGE, false).unwrap();
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].href, "/url?q=https://example.com/one");
        assert_eq!(anchors[1].href, "/url?q=https://example.com/two");
        // Non-verbose extraction leaves metadata empty.
        assert_eq!(anchors[0].title, "");
        assert_eq!(anchors[0].description, "");
    }

    #[test]
    fn test_verbose_extracts_title_and_description() {
        let anchors = parse_result_anchors(RESULTS_PAGE, true).unwrap();
        assert_eq!(anchors[0].title, "Example One");
        assert_eq!(anchors[0].description, "First description");
        assert_eq!(anchors[1].title, "Example Two");
        assert_eq!(anchors[1].description, "Second description");
    }

    #[test]
    fn test_description_falls_back_to_third_child() {
        let html = r#"<html><body><div id="search"><div class="g"><div class="r"><a href="https://example.com/x">Title</a></div><div></div><div class="s">Fallback description</div></div></div></body></html>"#;
        let anchors = parse_result_anchors(html, true).unwrap();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].description, "Fallback description");
    }

    #[test]
    fn test_missing_description_degrades_to_empty() {
        let html = r#"<html><body><div id="search"><a href="https://example.com/x">Title</a></div></body></html>"#;
        let anchors = parse_result_anchors(html, true).unwrap();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].description, "");
    }

    #[test]
    fn test_fallback_scan_skips_top_bar_anchors() {
        let anchors = parse_result_anchors(NO_CONTAINER_PAGE, false).unwrap();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].href, "/url?q=https://example.com/loose");
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let html = r#"<html><body><div id="search"><a name="top">No href</a><a href="https://example.com/y">Real</a></div></body></html>"#;
        let anchors = parse_result_anchors(html, false).unwrap();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].href, "https://example.com/y");
    }

    #[test]
    fn test_empty_page_yields_no_anchors() {
        let anchors = parse_result_anchors("<html><body></body></html>", false).unwrap();
        assert!(anchors.is_empty());
    }

    #[test]
    fn test_anchors_preserve_document_order() {
        let anchors = parse_result_anchors(RESULTS_PAGE, false).unwrap();
        let hrefs: Vec<_> = anchors.iter().map(|a| a.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec![
                "/url?q=https://example.com/one",
                "/url?q=https://example.com/two"
            ]
        );
    }
}
