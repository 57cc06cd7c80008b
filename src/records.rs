//! Raw and normalized vehicle/part records

use serde::{Deserialize, Serialize};

/// A vehicle as scraped from the listing and detail pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVehicleRecord {
    pub display_name: String,
    pub detail_page_url: String,
    pub raw_parts: Vec<RawPartRecord>,
}

/// One part row from a vehicle's detail page, as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPartRecord {
    pub display_name: String,
    pub identifier_text: String,
    pub description_text: String,
    pub price_text: String,
    pub image_url: String,
    pub thumbnail_url: String,
}

/// A normalized vehicle, ready for persistence
///
/// `year` is 0 when the name carries no 4-digit year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub brand: String,
    pub model: String,
    pub category: String,
    pub identifier: String,
    pub year: i32,
    #[serde(rename = "url")]
    pub listing_url: String,
    #[serde(default)]
    pub parts: Vec<PartRecord>,
}

/// A normalized part owned by a [`VehicleRecord`]
///
/// `price` is 0.0 when the price text could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub name: String,
    pub description: String,
    #[serde(rename = "id")]
    pub identifier: String,
    pub price: f64,
    pub image_url: String,
    pub thumbnail_url: String,
}

/// A class of vehicles with its own listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub listing_url: String,
}

impl Category {
    pub fn new(name: impl Into<String>, listing_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listing_url: listing_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_field_names() {
        let vehicle = VehicleRecord {
            brand: "Suzuki".to_string(),
            model: "RX".to_string(),
            category: "motorcycles".to_string(),
            identifier: "42".to_string(),
            year: 2019,
            listing_url: "https://example/a.htm".to_string(),
            parts: vec![PartRecord {
                name: "Front brake".to_string(),
                description: "Used".to_string(),
                identifier: "7".to_string(),
                price: 45.0,
                image_url: "https://example/i.jpg".to_string(),
                thumbnail_url: "https://example/t.jpg".to_string(),
            }],
        };

        let value = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(value["url"], "https://example/a.htm");
        assert_eq!(value["identifier"], "42");
        assert_eq!(value["parts"][0]["id"], "7");
        assert_eq!(value["parts"][0]["thumbnail_url"], "https://example/t.jpg");
        assert!(value.get("listing_url").is_none());
    }
}
