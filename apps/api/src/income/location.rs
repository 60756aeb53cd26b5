/// Lowercased alias → canonical metro name. Canonical names map to themselves
/// so "ATLANTA" and "atlanta" both land on "Atlanta".
const LOCATION_ALIASES: &[(&str, &str)] = &[
    ("atlanta", "Atlanta"),
    ("atl", "Atlanta"),
    ("baltimore", "Baltimore"),
    ("charlotte", "Charlotte"),
    ("clt", "Charlotte"),
    ("chicago", "Chicago"),
    ("chi", "Chicago"),
    ("dallas", "Dallas"),
    ("dfw", "Dallas"),
    ("dallas-fort worth", "Dallas"),
    ("houston", "Houston"),
    ("htx", "Houston"),
    ("miami", "Miami"),
    ("new york city", "New York City"),
    ("new york", "New York City"),
    ("nyc", "New York City"),
    ("ny", "New York City"),
    ("philadelphia", "Philadelphia"),
    ("philly", "Philadelphia"),
    ("washington dc", "Washington DC"),
    ("washington d.c.", "Washington DC"),
    ("washington", "Washington DC"),
    ("dc", "Washington DC"),
    ("d.c.", "Washington DC"),
    ("dmv", "Washington DC"),
];

/// Maps free-text locations onto canonical metro names.
///
/// Matching is case-insensitive. "City, ST" inputs are retried on the part
/// before the comma. Anything unrecognized is returned unchanged.
pub fn normalize_location(location: &str) -> String {
    canonical_metro(location)
        .map(str::to_string)
        .unwrap_or_else(|| location.to_string())
}

/// Canonical metro name for `location`, if it is a known alias.
pub fn canonical_metro(location: &str) -> Option<&'static str> {
    let key = location.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }

    lookup(&key).or_else(|| {
        key.split_once(',')
            .map(|(city, _)| city.trim())
            .filter(|city| !city.is_empty())
            .and_then(lookup)
    })
}

fn lookup(key: &str) -> Option<&'static str> {
    LOCATION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
}
