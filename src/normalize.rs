//! URL normalization for registry comparison.
//!
//! Feed URLs often carry per-consumer credentials in the query string. Two
//! URLs that differ only in those credentials point at the same feed, so both
//! candidate and registry URLs are cleaned before they are compared.

use tracing::debug;
use url::Url;

/// Query parameters removed by [`clean_url`]. Matching is exact and case-sensitive.
pub const STRIPPED_PARAMS: [&str; 2] = ["api_key", "token"];

/// Returns the canonical form of `raw` with credential query parameters removed.
///
/// Remaining parameters keep their order and multiplicity and are re-encoded
/// as `application/x-www-form-urlencoded`. When no parameters remain the `?`
/// is dropped. Strings that do not parse as absolute URLs are returned as-is.
pub fn clean_url(raw: &str) -> String {
    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            debug!(url = raw, error = %e, "URL did not parse, comparing it verbatim");
            return raw.to_string();
        }
    };

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(name, _)| !STRIPPED_PARAMS.iter().any(|param| name == param))
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    url.to_string()
}
