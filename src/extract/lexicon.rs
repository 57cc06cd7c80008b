//! Brand lexicon with a case- and separator-insensitive index

use std::collections::HashMap;

/// Brands recognised out of the box, in their canonical spelling
pub const BUILTIN_BRANDS: &[&str] = &[
    // Motorcycles, mopeds and scooters
    "Aprilia",
    "Beta",
    "BMW",
    "Buell",
    "CFMoto",
    "Derbi",
    "Ducati",
    "Gas Gas",
    "Gilera",
    "Harley Davidson",
    "Honda",
    "Husaberg",
    "Husqvarna",
    "Hyosung",
    "Indian",
    "Kawasaki",
    "KTM",
    "Kymco",
    "Moto Guzzi",
    "MV Agusta",
    "Peugeot",
    "Piaggio",
    "Rieju",
    "Royal Enfield",
    "Sherco",
    "Suzuki",
    "SYM",
    "Triumph",
    "Vespa",
    "Victory",
    "Yamaha",
    // ATVs and snowmobiles
    "Arctic Cat",
    "Can-Am",
    "Lynx",
    "Polaris",
    "Ski-Doo",
    "TGB",
    // Cars and vans
    "Audi",
    "Citroen",
    "Fiat",
    "Ford",
    "Hyundai",
    "Kia",
    "Land Rover",
    "Mazda",
    "Mercedes-Benz",
    "Mitsubishi",
    "Nissan",
    "Opel",
    "Renault",
    "Saab",
    "Seat",
    "Skoda",
    "Subaru",
    "Toyota",
    "Volkswagen",
    "Volvo",
];

/// Immutable brand index, built once and shared read-only
///
/// Keys are lowercased with spaces and hyphens removed, so "Harley-Davidson",
/// "harley davidson" and "HarleyDavidson" all resolve to the same entry.
#[derive(Debug, Clone)]
pub struct BrandLexicon {
    index: HashMap<String, String>,
}

impl BrandLexicon {
    /// Builds a lexicon from canonical brand names
    ///
    /// When two names normalize to the same key, the first one is kept.
    pub fn new<I, S>(brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = HashMap::new();
        for brand in brands {
            let canonical = brand.as_ref().trim();
            let key = normalize_key(canonical);
            if key.is_empty() {
                continue;
            }
            index
                .entry(key)
                .or_insert_with(|| canonical.to_string());
        }
        Self { index }
    }

    /// The built-in lexicon
    pub fn builtin() -> Self {
        Self::new(BUILTIN_BRANDS.iter().copied())
    }

    /// The built-in lexicon plus `extra` brands
    pub fn with_extras<S: AsRef<str>>(extra: &[S]) -> Self {
        Self::new(
            BUILTIN_BRANDS
                .iter()
                .map(|b| b.to_string())
                .chain(extra.iter().map(|b| b.as_ref().to_string())),
        )
    }

    /// Looks up a candidate string, returning the canonical brand name
    pub fn lookup(&self, candidate: &str) -> Option<&str> {
        self.index.get(&normalize_key(candidate)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for BrandLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lowercases and strips spaces and hyphens
pub fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Harley-Davidson"), "harleydavidson");
        assert_eq!(normalize_key("Harley Davidson"), "harleydavidson");
        assert_eq!(normalize_key("  KTM "), "ktm");
    }

    #[test]
    fn test_lookup_is_case_and_separator_insensitive() {
        let lexicon = BrandLexicon::builtin();
        assert_eq!(lexicon.lookup("harley-davidson"), Some("Harley Davidson"));
        assert_eq!(lexicon.lookup("HARLEY DAVIDSON"), Some("Harley Davidson"));
        assert_eq!(lexicon.lookup("skidoo"), Some("Ski-Doo"));
        assert_eq!(lexicon.lookup("Unknown"), None);
    }

    #[test]
    fn test_first_spelling_wins() {
        let lexicon = BrandLexicon::new(["Can-Am", "Can Am"]);
        assert_eq!(lexicon.len(), 1);
        assert_eq!(lexicon.lookup("canam"), Some("Can-Am"));
    }

    #[test]
    fn test_with_extras() {
        let lexicon = BrandLexicon::with_extras(&["Tomos", "Suzuki"]);
        assert_eq!(lexicon.lookup("tomos"), Some("Tomos"));
        assert_eq!(lexicon.len(), BrandLexicon::builtin().len() + 1);
    }

    #[test]
    fn test_blank_entries_are_skipped() {
        let lexicon = BrandLexicon::new(["", " - "]);
        assert!(lexicon.is_empty());
    }
}
