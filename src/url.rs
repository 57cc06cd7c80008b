//! URL helpers for the source site
//!
//! Domain extraction, allowed-domain matching, and listing slugs.

use url::Url;

/// Extracts the lowercase host from a URL
///
/// ```
/// use url::Url;
/// use salvage_ingest::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Purkuosat.net/a.htm").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.purkuosat.net".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks if a domain matches a pattern
///
/// `"example.com"` matches only itself; `"*.example.com"` matches the bare
/// domain and any subdomain of it.
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}

/// Returns true if `domain` matches any of `patterns`
///
/// An empty pattern list allows every domain.
pub fn is_domain_allowed(domain: &str, patterns: &[String]) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| matches_wildcard(p, domain))
}

/// Key under which politeness limits are tracked for `domain`
///
/// The first pattern in `patterns` that matches is the key, so every host it
/// covers shares one budget. An unmatched domain is its own key.
///
/// ```
/// use salvage_ingest::url::politeness_key;
///
/// let patterns = vec!["*.purkuosat.net".to_string()];
/// assert_eq!(politeness_key("www.purkuosat.net", &patterns), "*.purkuosat.net");
/// assert_eq!(politeness_key("example.com", &patterns), "example.com");
/// ```
pub fn politeness_key(domain: &str, patterns: &[String]) -> String {
    patterns
        .iter()
        .find(|p| matches_wildcard(p, domain))
        .cloned()
        .unwrap_or_else(|| domain.to_string())
}

/// Returns the last path segment of a URL without its file extension
///
/// Detail pages on the source site are named after the vehicle, so the slug
/// is a readable label for log lines.
///
/// ```
/// use salvage_ingest::url::listing_slug;
///
/// assert_eq!(
///     listing_slug("https://www.purkuosat.net/apriliamx12504.htm"),
///     Some("apriliamx12504".to_string())
/// );
/// ```
pub fn listing_slug(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let stem = match segment.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => segment,
    };
    Some(stem.to_string())
}
