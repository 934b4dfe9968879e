//! Merging of per-strategy result lists into one duplicate-free set.

use std::collections::HashSet;

use datedice_core::PlaceCandidate;
use serde::Serialize;

/// Coordinates are compared after rounding to 1e-7 degrees (~1 cm).
const COORDINATE_SCALE: f64 = 1e7;

/// Ordered, duplicate-free places in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchResultSet(Vec<PlaceCandidate>);

impl SearchResultSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PlaceCandidate] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlaceCandidate> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<PlaceCandidate> {
        self.0
    }
}

impl<'a> IntoIterator for &'a SearchResultSet {
    type Item = &'a PlaceCandidate;
    type IntoIter = std::slice::Iter<'a, PlaceCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(PartialEq, Eq, Hash)]
struct PlaceKey {
    lat: i64,
    lon: i64,
    name: Option<String>,
}

impl PlaceKey {
    #[allow(clippy::cast_possible_truncation)]
    fn of(candidate: &PlaceCandidate) -> Self {
        // Coordinates are bounded to ±180°, so the scaled values fit in i64.
        Self {
            lat: (candidate.coordinate.latitude() * COORDINATE_SCALE).round() as i64,
            lon: (candidate.coordinate.longitude() * COORDINATE_SCALE).round() as i64,
            name: candidate.name.clone(),
        }
    }
}

/// Concatenate `lists` in order and keep the first occurrence of each place.
///
/// Two candidates are the same place when their names match and their
/// coordinates match after rounding.
pub fn merge<I>(lists: I) -> SearchResultSet
where
    I: IntoIterator<Item = Vec<PlaceCandidate>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for candidate in lists.into_iter().flatten() {
        if seen.insert(PlaceKey::of(&candidate)) {
            merged.push(candidate);
        }
    }

    SearchResultSet(merged)
}
