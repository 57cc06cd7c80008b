//! Text normalization helpers
//!
//! Pure functions that turn raw page text into canonical tokens.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// First ASCII integer or decimal numeral in a string ("123" or "123.45")
static PRICE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+|[0-9]+").expect("valid price regex"));

/// Errors raised while parsing a price string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("no numeric token in {0:?}")]
    NoNumericToken(String),
}

/// Replaces every whitespace run with a single space and trims both ends
///
/// ```
/// use salvage_ingest::text::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  Suzuki \n RX\t2019 "), "Suzuki RX 2019");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses the first numeral in `s` as a price
///
/// Currency symbols and surrounding text are ignored. Only a period is
/// recognised as decimal separator, so `"45,00 €"` parses as `45.0`.
///
/// # Returns
///
/// * `Ok(f64)` - The parsed value
/// * `Err(PriceError::NoNumericToken)` - No digits in the input
pub fn parse_price(s: &str) -> Result<f64, PriceError> {
    let token = PRICE_TOKEN
        .find(s)
        .ok_or_else(|| PriceError::NoNumericToken(s.to_string()))?;

    // The token is all digits with at most one period, so this only fails on
    // inputs the regex cannot produce.
    token
        .as_str()
        .parse::<f64>()
        .map_err(|_| PriceError::NoNumericToken(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("Front   brake"), "Front brake");
        assert_eq!(collapse_whitespace("\n\tFront\r\n brake \t"), "Front brake");
        assert_eq!(collapse_whitespace("Front\u{a0}brake"), "Front brake");
        assert_eq!(collapse_whitespace("   "), "");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_parse_price_decimal_with_currency() {
        assert_eq!(parse_price("€ 123.45 incl. VAT"), Ok(123.45));
    }

    #[test]
    fn test_parse_price_integer() {
        assert_eq!(parse_price("Hinta: 80 €"), Ok(80.0));
        assert_eq!(parse_price("80"), Ok(80.0));
    }

    #[test]
    fn test_parse_price_decimal_comma_takes_integer_part() {
        assert_eq!(parse_price("45,00 €"), Ok(45.0));
    }

    #[test]
    fn test_parse_price_first_numeral_wins() {
        assert_eq!(parse_price("12.50 / 2 pcs"), Ok(12.5));
    }

    #[test]
    fn test_parse_price_skips_non_ascii_digits() {
        assert_eq!(parse_price("٤٥ / 45 EUR"), Ok(45.0));
        assert_eq!(
            parse_price("٤٥ EUR"),
            Err(PriceError::NoNumericToken("٤٥ EUR".to_string()))
        );
    }

    #[test]
    fn test_parse_price_without_digits() {
        assert_eq!(
            parse_price("ask for price"),
            Err(PriceError::NoNumericToken("ask for price".to_string()))
        );
        assert!(parse_price("").is_err());
    }
}
