// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fare arithmetic over the static service-area route table.
//!
//! Distances are keyed by lexicographically ordered location pair so that
//! either direction of travel resolves to the same entry. Routes missing
//! from the table fall back to a default distance rather than failing.

use crate::error::DomainError;

/// Distance assumed for location pairs absent from the route table.
const DEFAULT_DISTANCE_KM: f64 = 15.0;

/// Known route distances in kilometers, keyed by ordered location pair.
const ROUTE_DISTANCES_KM: &[(&str, &str, f64)] = &[
    // Major hubs
    ("Adyar", "AnnaNagar", 14.0),
    ("Adyar", "Guindy", 7.0),
    ("Adyar", "Marina", 8.0),
    ("Adyar", "Sholinganallur", 14.0),
    ("Adyar", "Tambaram", 18.0),
    ("Adyar", "TNagar", 6.0),
    ("Adyar", "Velachery", 5.0),
    ("AnnaNagar", "Guindy", 11.0),
    ("AnnaNagar", "Marina", 12.0),
    ("AnnaNagar", "Sholinganallur", 26.0),
    ("AnnaNagar", "Tambaram", 22.0),
    ("AnnaNagar", "TNagar", 9.0),
    ("AnnaNagar", "Velachery", 16.0),
    ("Guindy", "Marina", 12.0),
    ("Guindy", "Sholinganallur", 16.0),
    ("Guindy", "Tambaram", 14.0),
    ("Guindy", "TNagar", 6.0),
    ("Guindy", "Velachery", 4.0),
    ("Marina", "Sholinganallur", 22.0),
    ("Marina", "Tambaram", 26.0),
    ("Marina", "TNagar", 7.0),
    ("Marina", "Velachery", 13.0),
    ("Sholinganallur", "Tambaram", 14.0),
    ("Sholinganallur", "TNagar", 19.0),
    ("Sholinganallur", "Velachery", 10.0),
    ("TNagar", "Tambaram", 18.0),
    ("Tambaram", "Velachery", 14.0),
    ("TNagar", "Velachery", 9.0),
    // OMR locals, short connectors
    ("Kelambakkam", "Siruseri", 5.0),
    ("Navalur", "Siruseri", 7.0),
    ("Navalur", "Sholinganallur", 5.0),
    ("Medavakkam", "Sholinganallur", 8.0),
    ("Perungudi", "Thoraipakkam", 3.0),
    ("Perungudi", "Velachery", 4.0),
    ("Sholinganallur", "Thoraipakkam", 6.0),
];

/// Canonical spellings of every location the service covers.
const LOCATIONS: &[&str] = &[
    "Adyar",
    "AnnaNagar",
    "Guindy",
    "Kelambakkam",
    "Marina",
    "Medavakkam",
    "Navalur",
    "Perungudi",
    "Sholinganallur",
    "Siruseri",
    "Tambaram",
    "Thoraipakkam",
    "TNagar",
    "Velachery",
];

/// Resolves user input to the canonical location spelling.
///
/// Matching is case-insensitive; surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns `DomainError::UnknownLocation` if the input names no covered
/// location.
pub fn normalize_location(input: &str) -> Result<String, DomainError> {
    let trimmed: &str = input.trim();
    LOCATIONS
        .iter()
        .find(|loc| loc.eq_ignore_ascii_case(trimmed))
        .map(|loc| (*loc).to_string())
        .ok_or_else(|| DomainError::UnknownLocation(input.to_string()))
}

/// Lists every covered location in canonical spelling, sorted.
#[must_use]
pub fn available_locations() -> Vec<String> {
    let mut locations: Vec<String> = LOCATIONS.iter().map(|loc| (*loc).to_string()).collect();
    locations.sort();
    locations
}

/// Looks up the route distance between two canonical locations.
///
/// Unknown pairs fall back to the default distance.
#[must_use]
pub fn route_distance(source: &str, destination: &str) -> f64 {
    let (first, second): (&str, &str) = if source < destination {
        (source, destination)
    } else {
        (destination, source)
    };
    ROUTE_DISTANCES_KM
        .iter()
        .find(|(a, b, _)| *a == first && *b == second)
        .map_or(DEFAULT_DISTANCE_KM, |(_, _, km)| *km)
}

/// Per-kilometer rate for a given trip distance. Longer trips earn a
/// cheaper rate.
#[must_use]
pub fn rate_per_km(distance_km: f64) -> f64 {
    if distance_km > 30.0 {
        7.0
    } else if distance_km > 20.0 {
        8.0
    } else if distance_km > 10.0 {
        9.0
    } else {
        10.0
    }
}

/// Rounds a money amount to two decimals (whole paise).
#[must_use]
pub fn round_to_paise(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Computes the fare for a route.
///
/// Both endpoints are normalized first, so the caller may pass raw input.
///
/// # Errors
///
/// Returns `DomainError::UnknownLocation` if either endpoint names no
/// covered location.
pub fn calculate_fare(source: &str, destination: &str) -> Result<f64, DomainError> {
    let src: String = normalize_location(source)?;
    let dest: String = normalize_location(destination)?;
    let distance: f64 = route_distance(&src, &dest);
    Ok(round_to_paise(distance * rate_per_km(distance)))
}
