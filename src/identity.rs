//! Content-derived record identifiers
//!
//! Identifiers are the decimal form of a 32-bit FNV-1a hash over the
//! concatenated input fields. The hash is fast and deterministic but not
//! collision-proof; duplicates are caught when a batch is persisted.

const FNV1A32_OFFSET: u32 = 0x811c_9dc5;
const FNV1A32_PRIME: u32 = 0x0100_0193;

fn fnv1a_32(parts: &[&str]) -> u32 {
    let mut hash = FNV1A32_OFFSET;
    for part in parts {
        for byte in part.bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(FNV1A32_PRIME);
        }
    }
    hash
}

/// Generates an identifier from the given fields, concatenated without a delimiter
///
/// ```
/// use salvage_ingest::identity::generate_identifier;
///
/// assert_eq!(generate_identifier(&["a", "bc"]), generate_identifier(&["ab", "c"]));
/// assert_eq!(generate_identifier(&[]), "2166136261");
/// ```
pub fn generate_identifier(parts: &[&str]) -> String {
    fnv1a_32(parts).to_string()
}

/// Identifier of a vehicle: listing URL followed by the normalized display name
pub fn vehicle_identifier(listing_url: &str, normalized_name: &str) -> String {
    generate_identifier(&[listing_url, normalized_name])
}

/// Identifier of a part: the site's part identifier text followed by the
/// owning vehicle's normalized display name
pub fn part_identifier(identifier_text: &str, vehicle_name: &str) -> String {
    generate_identifier(&[identifier_text, vehicle_name])
}
