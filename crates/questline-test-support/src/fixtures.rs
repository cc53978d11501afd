//! Game configuration fixtures.
//!
//! Fixtures are deserialized into whatever configuration type the caller
//! names, so this crate does not depend on the registry.

use serde::de::DeserializeOwned;

/// Locations `A` and `B` with one station each, one caretaker per station
/// and one admin.
pub const TWO_LOCATION_CONFIG: &str = r#"{
    "locations": [
        {"name": "A", "stations": 1},
        {"name": "B", "stations": 1}
    ],
    "caretakers": {"care-a1": "A-1", "care-b1": "B-1"},
    "admins": ["admin"]
}"#;

/// Locations `A`, `Plov-Center` (two stations) and `C`. `Plov-Center-1` has
/// two caretakers, `C-1` has none.
const THREE_LOCATION_CONFIG: &str = r#"{
    "locations": [
        {"name": "A", "stations": 1},
        {"name": "Plov-Center", "stations": 2},
        {"name": "C", "stations": 1}
    ],
    "caretakers": {
        "care-a1": "A-1",
        "care-p1": "Plov-Center-1",
        "care-p1-bis": "Plov-Center-1",
        "care-p2": "Plov-Center-2"
    },
    "admins": ["admin"]
}"#;

fn parse<T: DeserializeOwned>(raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_else(|e| panic!("fixture config is invalid: {e}"))
}

/// [`TWO_LOCATION_CONFIG`] as the caller's configuration type.
///
/// # Panics
///
/// Panics if the fixture does not deserialize into `T`.
#[must_use]
pub fn two_location_config<T: DeserializeOwned>() -> T {
    parse(TWO_LOCATION_CONFIG)
}

/// Three locations, four stations, uneven caretaker coverage.
///
/// # Panics
///
/// Panics if the fixture does not deserialize into `T`.
#[must_use]
pub fn three_location_config<T: DeserializeOwned>() -> T {
    parse(THREE_LOCATION_CONFIG)
}
