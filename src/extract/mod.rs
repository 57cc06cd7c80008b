//! Heuristic field extraction from vehicle display names
//!
//! Display names on the source site look like `"Suzuki RX 3 2019"`: a brand,
//! a free-form model, and usually a year. This module recovers the three
//! fields using a fixed brand lexicon as the anchor.

mod fields;
mod lexicon;

pub use fields::{extract_brand, extract_model, extract_year, match_brand, BrandMatch, MAX_BRAND_WORDS};
pub use lexicon::{normalize_key, BrandLexicon, BUILTIN_BRANDS};
