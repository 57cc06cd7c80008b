//! Conversion of raw scraped records into normalized records

use crate::extract::{extract_brand, extract_model, extract_year, BrandLexicon};
use crate::identity::{part_identifier, vehicle_identifier};
use crate::records::{PartRecord, RawPartRecord, RawVehicleRecord, VehicleRecord};
use crate::text::{collapse_whitespace, parse_price};

/// Normalizes every raw vehicle of one category, preserving order
pub fn normalize_batch(
    raw_vehicles: &[RawVehicleRecord],
    category: &str,
    lexicon: &BrandLexicon,
) -> Vec<VehicleRecord> {
    tracing::info!(
        "Normalizing {} raw vehicles for category '{}'",
        raw_vehicles.len(),
        category
    );
    raw_vehicles
        .iter()
        .map(|raw| normalize_vehicle(raw, category, lexicon))
        .collect()
}

/// Normalizes one raw vehicle and its parts
///
/// Unparsable prices are logged and stored as 0.0.
pub fn normalize_vehicle(
    raw: &RawVehicleRecord,
    category: &str,
    lexicon: &BrandLexicon,
) -> VehicleRecord {
    let name = collapse_whitespace(&raw.display_name);

    let parts = raw
        .raw_parts
        .iter()
        .map(|part| normalize_part(part, &name, &raw.detail_page_url))
        .collect();

    VehicleRecord {
        brand: extract_brand(&name, lexicon),
        model: extract_model(&name, lexicon),
        category: category.to_string(),
        identifier: vehicle_identifier(&raw.detail_page_url, &name),
        year: extract_year(&name),
        listing_url: raw.detail_page_url.clone(),
        parts,
    }
}

fn normalize_part(raw: &RawPartRecord, vehicle_name: &str, vehicle_url: &str) -> PartRecord {
    let price = match parse_price(&raw.price_text) {
        Ok(price) => price,
        Err(e) => {
            tracing::warn!(
                "Cannot parse price of part {:?} ({}): {}",
                raw.identifier_text,
                vehicle_url,
                e
            );
            0.0
        }
    };

    PartRecord {
        name: collapse_whitespace(&raw.display_name),
        description: collapse_whitespace(&raw.description_text),
        identifier: part_identifier(&raw.identifier_text, vehicle_name),
        price,
        image_url: raw.image_url.clone(),
        thumbnail_url: raw.thumbnail_url.clone(),
    }
}
