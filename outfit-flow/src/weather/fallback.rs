use crate::state::Weather;

/// Key of the entry used for unrecognised locations
pub const DEFAULT_LOCATION: &str = "Default";

/// Static weather table that every live lookup degrades to.
///
/// The search-backed and API-backed providers each carry their own table;
/// the two sets are not merged.
#[derive(Debug, Clone)]
pub struct FallbackTable {
    entries: &'static [(&'static str, f64, &'static str)],
}

const SEARCH_ENTRIES: &[(&str, f64, &str)] = &[
    ("Delhi", 35.0, "Sunny and Hot"),
    ("Mumbai", 28.0, "Humid and Cloudy"),
    ("Bangalore", 25.0, "Pleasant and Breezy"),
    ("Chennai", 32.0, "Hot and Humid"),
    ("Kolkata", 30.0, "Warm and Rainy"),
    ("Rajasthan", 40.0, "Very Hot and Dry"),
    ("Kerala", 29.0, "Tropical and Humid"),
    ("Pune", 26.0, "Pleasant and Partly Cloudy"),
    ("Shimla", 18.0, "Cool and Misty"),
    ("Patna", 33.0, "Hot and Humid"),
    ("Dubai", 38.0, "Very Hot and Dry"),
    ("Indore", 28.0, "Warm and Clear"),
    (DEFAULT_LOCATION, 27.0, "Moderate"),
];

const DIRECT_API_ENTRIES: &[(&str, f64, &str)] = &[
    ("Delhi", 35.0, "Sunny and Hot"),
    ("Mumbai", 28.0, "Humid and Cloudy"),
    ("Bangalore", 25.0, "Pleasant and Breezy"),
    ("Chennai", 32.0, "Hot and Humid"),
    ("Kolkata", 30.0, "Warm and Rainy"),
    ("Rajasthan", 40.0, "Very Hot and Dry"),
    ("Kerala", 29.0, "Tropical and Humid"),
    (DEFAULT_LOCATION, 27.0, "Moderate"),
];

impl FallbackTable {
    /// Table paired with the search-based provider
    pub fn search() -> Self {
        Self {
            entries: SEARCH_ENTRIES,
        }
    }

    /// Table paired with the direct weather API provider
    pub fn direct_api() -> Self {
        Self {
            entries: DIRECT_API_ENTRIES,
        }
    }

    /// Exact-match lookup, falling back to the default entry.
    pub fn lookup(&self, location: &str) -> Weather {
        let (_, temperature, condition) = self
            .entries
            .iter()
            .find(|(name, _, _)| *name == location)
            .or_else(|| self.entries.iter().find(|(name, _, _)| *name == DEFAULT_LOCATION))
            .copied()
            .unwrap_or((DEFAULT_LOCATION, 27.0, "Moderate"));
        Weather::fallback(temperature, condition)
    }

    /// Known location names in table order, without the default entry
    pub fn locations(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .map(|(name, _, _)| *name)
            .filter(|name| *name != DEFAULT_LOCATION)
            .collect()
    }
}
