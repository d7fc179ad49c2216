//! Search URL construction.
//!
//! Builds the four URL variants Google's result pages are requested with:
//! first page vs continuation page, crossed with the default 10-result page
//! vs an explicit `num` page. Building is deterministic: the same
//! configuration and offset always yield byte-identical URLs.

use chrono::NaiveDate;

use crate::config::SearchConfig;

fn base_url(config: &SearchConfig) -> String {
    match &config.base_url {
        Some(base) => base.trim_end_matches('/').to_string(),
        None => format!("https://www.google.{}", config.tld),
    }
}

/// URL of the search engine's home page, fetched once per session to pick
/// up baseline cookies before the first query.
pub fn build_home_url(config: &SearchConfig) -> String {
    format!("{}/", base_url(config))
}

/// Builds the search URL for the page beginning at result offset `start`.
///
/// The query is percent-encoded with spaces as `+`. `start` is omitted on
/// the first page (which carries `btnG` instead) and `num` is omitted when
/// it equals the default page size of 10. `filter=0` disables Google's
/// near-duplicate collapsing. Extra parameters are appended verbatim, in
/// key order, after the built-in ones.
pub fn build_search_url(config: &SearchConfig, start: u32) -> String {
    let base = base_url(config);
    let query = urlencoding::encode(&config.query).replace("%20", "+");

    let mut url = match (start, config.num) {
        (0, 10) => format!(
            "{base}/search?hl={hl}&lr={lr}&q={query}&btnG=Google+Search&tbs={tbs}&safe={safe}&cr={cr}&filter=0",
            hl = config.lang_ui,
            lr = config.lang_result,
            tbs = config.tbs,
            safe = config.safe,
            cr = config.country,
        ),
        (0, num) => format!(
            "{base}/search?hl={hl}&lr={lr}&q={query}&num={num}&btnG=Google+Search&tbs={tbs}&safe={safe}&cr={cr}&filter=0",
            hl = config.lang_ui,
            lr = config.lang_result,
            tbs = config.tbs,
            safe = config.safe,
            cr = config.country,
        ),
        (start, 10) => format!(
            "{base}/search?hl={hl}&lr={lr}&q={query}&start={start}&tbs={tbs}&safe={safe}&cr={cr}&filter=0",
            hl = config.lang_ui,
            lr = config.lang_result,
            tbs = config.tbs,
            safe = config.safe,
            cr = config.country,
        ),
        (start, num) => format!(
            "{base}/search?hl={hl}&lr={lr}&q={query}&start={start}&num={num}&tbs={tbs}&safe={safe}&cr={cr}&filter=0",
            hl = config.lang_ui,
            lr = config.lang_result,
            tbs = config.tbs,
            safe = config.safe,
            cr = config.country,
        ),
    };

    // Caller guarantees these are already url-encoded; appended as-is.
    for (key, value) in &config.extra_params {
        url.push('&');
        url.push_str(key);
        url.push('=');
        url.push_str(value);
    }

    url
}

/// Formats a custom search period as a `tbs` parameter value.
///
/// Note that verbatim mode also uses `tbs`; this helper is only for
/// customized date ranges.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use googleserp_core::url::date_range_tbs;
///
/// let from = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
/// let to = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
/// assert_eq!(date_range_tbs(from, to), "cdr:1,cd_min:01/01/2021,cd_max:06/01/2021");
/// ```
pub fn date_range_tbs(from: NaiveDate, to: NaiveDate) -> String {
    format!(
        "cdr:1,cd_min:{},cd_max:{}",
        from.format("%m/%d/%Y"),
        to.format("%m/%d/%Y")
    )
}
