//! HTML parser for the catalog's listing and detail pages
//!
//! The source site uses a fixed legacy layout:
//!
//! **Listing page:** every vehicle entry is a `<font size="2">` element with
//! one `<a>` whose text is the vehicle name and whose `href` is the detail page.
//!
//! **Detail page:** every part is a `<table width="75%">` laid out as
//!
//! | row | column | content |
//! |-----|--------|---------|
//! | 1 | 1 | `<a href=full image><img src=thumbnail></a>` |
//! | 1 | 3 | part name |
//! | 2 | 2 | part identifier |
//! | 3 | 2 | description |
//! | 4 | 2 | price, inside `<font><b>` |

use crate::records::RawPartRecord;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A vehicle entry found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleLink {
    pub display_name: String,
    pub detail_page_url: String,
}

struct ListingSelectors {
    entry: Selector,
    anchor: Selector,
}

impl ListingSelectors {
    fn new() -> Result<Self, String> {
        Ok(Self {
            entry: parse_selector(r#"font[size="2"]"#)?,
            anchor: parse_selector("a")?,
        })
    }
}

struct DetailSelectors {
    table: Selector,
    image_link: Selector,
    thumbnail: Selector,
    name: Selector,
    identifier: Selector,
    description: Selector,
    price: Selector,
    price_cell: Selector,
}

impl DetailSelectors {
    fn new() -> Result<Self, String> {
        Ok(Self {
            table: parse_selector(r#"table[width="75%"]"#)?,
            image_link: parse_selector("tr:nth-of-type(1) > td:nth-of-type(1) > a")?,
            thumbnail: parse_selector("tr:nth-of-type(1) > td:nth-of-type(1) > a > img")?,
            name: parse_selector("tr:nth-of-type(1) > td:nth-of-type(3)")?,
            identifier: parse_selector("tr:nth-of-type(2) > td:nth-of-type(2)")?,
            description: parse_selector("tr:nth-of-type(3) > td:nth-of-type(2)")?,
            price: parse_selector("tr:nth-of-type(4) > td:nth-of-type(2) > font > b:nth-of-type(1)")?,
            price_cell: parse_selector("tr:nth-of-type(4) > td:nth-of-type(2)")?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector {:?}: {:?}", css, e))
}

/// Parses a listing page into vehicle links
///
/// Entries without a name are skipped silently. Entries whose link is missing
/// or cannot be resolved against `base_url` are skipped with a debug log.
///
/// # Example
///
/// ```
/// use salvage_ingest::crawler::parse_listing_page;
/// use url::Url;
///
/// let html = r#"<font size="2"><a href="suzukirx.htm">Suzuki RX 2019</a></font>"#;
/// let base = Url::parse("https://www.purkuosat.net/purkumotot.htm").unwrap();
/// let links = parse_listing_page(html, &base).unwrap();
/// assert_eq!(links[0].detail_page_url, "https://www.purkuosat.net/suzukirx.htm");
/// ```
pub fn parse_listing_page(html: &str, base_url: &Url) -> Result<Vec<VehicleLink>, String> {
    let selectors = ListingSelectors::new()?;
    let document = Html::parse_document(html);

    let mut links = Vec::new();
    for entry in document.select(&selectors.entry) {
        let display_name = child_text(&entry, &selectors.anchor);
        if display_name.is_empty() {
            continue;
        }

        let href = child_attr(&entry, &selectors.anchor, "href");
        match href.as_deref().and_then(|h| resolve_link(h, base_url)) {
            Some(detail_page_url) => links.push(VehicleLink {
                display_name,
                detail_page_url,
            }),
            None => {
                tracing::debug!("Skipping '{}': no usable link ({:?})", display_name, href);
            }
        }
    }

    Ok(links)
}

/// Parses a vehicle's detail page into raw part rows
pub fn parse_detail_page(html: &str, base_url: &Url) -> Result<Vec<RawPartRecord>, String> {
    let selectors = DetailSelectors::new()?;
    let document = Html::parse_document(html);

    let parts = document
        .select(&selectors.table)
        .map(|table| {
            let mut price_text = child_text(&table, &selectors.price);
            if price_text.is_empty() {
                price_text = child_text(&table, &selectors.price_cell);
            }

            RawPartRecord {
                display_name: child_text(&table, &selectors.name),
                identifier_text: child_text(&table, &selectors.identifier),
                description_text: child_text(&table, &selectors.description),
                price_text,
                image_url: child_url(&table, &selectors.image_link, "href", base_url),
                thumbnail_url: child_url(&table, &selectors.thumbnail, "src", base_url),
            }
        })
        .collect();

    Ok(parts)
}

/// Concatenated, trimmed text of every element under `element` matching `selector`
fn child_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .flat_map(|child| child.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Attribute of the first element under `element` matching `selector`
fn child_attr(element: &ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|child| child.value().attr(attr))
        .map(str::to_string)
}

fn child_url(element: &ElementRef, selector: &Selector, attr: &str, base_url: &Url) -> String {
    child_attr(element, selector, attr)
        .and_then(|href| resolve_link(&href, base_url))
        .unwrap_or_default()
}

/// Resolves a link href to an absolute HTTP(S) URL
///
/// Returns None for empty hrefs, fragment-only links, `javascript:`/`mailto:`
/// links, and anything that does not resolve to HTTP or HTTPS.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}
