//! Brand, model and year extraction from vehicle display names

use crate::extract::lexicon::BrandLexicon;
use regex::Regex;
use std::sync::LazyLock;

/// Number of leading words tried when matching a brand (1, then 2)
pub const MAX_BRAND_WORDS: usize = 2;

/// Four ASCII digits
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("valid year regex"));

/// `BRAND_WINDOWS[n]` matches the first `n + 1` words (word chars and hyphens)
static BRAND_WINDOWS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    (1..=MAX_BRAND_WORDS)
        .map(|words| {
            let pattern = format!(r"^[\w-]+{}", r"\s[\w-]+".repeat(words - 1));
            Regex::new(&pattern).expect("valid brand window regex")
        })
        .collect()
});

/// A brand found at the start of a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandMatch<'a> {
    /// Canonical brand name from the lexicon
    pub brand: &'a str,
    /// Byte offset, in the trimmed name, just past the matched words
    pub end: usize,
}

/// Returns the first 4-digit run in `s` as a year, or 0 if there is none
pub fn extract_year(s: &str) -> i32 {
    YEAR.find(s)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Matches the leading words of an already-trimmed name against the lexicon
///
/// Tries a one-word window, then widens it by one word; gives up after
/// [`MAX_BRAND_WORDS`] attempts.
pub fn match_brand<'a>(trimmed: &str, lexicon: &'a BrandLexicon) -> Option<BrandMatch<'a>> {
    for window in BRAND_WINDOWS.iter() {
        let m = window.find(trimmed)?;
        if let Some(brand) = lexicon.lookup(m.as_str()) {
            return Some(BrandMatch { brand, end: m.end() });
        }
    }
    None
}

/// Returns the canonical brand at the start of `s`, or an empty string
pub fn extract_brand(s: &str, lexicon: &BrandLexicon) -> String {
    match_brand(s.trim(), lexicon)
        .map(|m| m.brand.to_string())
        .unwrap_or_default()
}

/// Returns the text between the brand and the year
///
/// Without a brand there is no anchor and the result is empty. Without a year
/// the whole remainder after the brand is returned. The year is searched for
/// after the matched brand words, so the brand text itself is never split.
pub fn extract_model(s: &str, lexicon: &BrandLexicon) -> String {
    let trimmed = s.trim();
    let Some(brand) = match_brand(trimmed, lexicon) else {
        return String::new();
    };

    let rest = &trimmed[brand.end..];
    let model = if extract_year(trimmed) != 0 {
        match YEAR.find(rest) {
            Some(year) => &rest[..year.start()],
            None => rest,
        }
    } else {
        rest
    };

    model.trim().to_string()
}
