//! Random activity selection without immediate repetition.

use datedice_core::{ActivityCatalog, ActivityLabel, PoiCategory};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks activity labels from the term and category catalogs.
///
/// Each draw is uniform over the catalog minus the current value, done in a
/// single bounded step so a one-entry catalog cannot spin.
pub struct Randomizer {
    terms: Vec<String>,
    categories: Vec<PoiCategory>,
    rng: StdRng,
}

impl Randomizer {
    /// Seeds from the operating system.
    ///
    /// # Panics
    ///
    /// Panics if the catalog has no terms. Catalog files are validated on
    /// load, so this only fires on a programming error.
    #[must_use]
    pub fn from_catalog(catalog: &ActivityCatalog) -> Self {
        Self::new(catalog, StdRng::from_os_rng())
    }

    /// # Panics
    ///
    /// Panics if the catalog has no terms.
    #[must_use]
    pub fn new(catalog: &ActivityCatalog, rng: StdRng) -> Self {
        assert!(
            !catalog.terms.is_empty(),
            "activity catalog must contain at least one term"
        );
        Self {
            terms: catalog.terms.clone(),
            categories: catalog.categories.clone(),
            rng,
        }
    }

    /// Deterministic randomizer for tests and reproducible runs.
    #[must_use]
    pub fn seeded(catalog: &ActivityCatalog, seed: u64) -> Self {
        Self::new(catalog, StdRng::seed_from_u64(seed))
    }

    /// Resample both the term and the category.
    ///
    /// Neither matches its value in `current` unless its catalog has a single
    /// entry.
    pub fn next_label(&mut self, current: Option<&ActivityLabel>) -> ActivityLabel {
        let term = pick_distinct(
            &mut self.rng,
            &self.terms,
            current.map(|label| &label.term),
        )
        .clone();

        let category = if self.categories.is_empty() {
            None
        } else {
            let current_category = current.and_then(|label| label.category.as_ref());
            Some(*pick_distinct(
                &mut self.rng,
                &self.categories,
                current_category,
            ))
        };

        ActivityLabel { term, category }
    }
}

fn pick_distinct<'a, T: PartialEq>(
    rng: &mut StdRng,
    items: &'a [T],
    current: Option<&T>,
) -> &'a T {
    let len = items.len();
    if len == 1 {
        return &items[0];
    }

    match current.and_then(|c| items.iter().position(|item| item == c)) {
        Some(skip) => {
            let mut idx = rng.random_range(0..len - 1);
            if idx >= skip {
                idx += 1;
            }
            &items[idx]
        }
        None => &items[rng.random_range(0..len)],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use datedice_core::FeatureTier;

    use super::*;

    fn catalog(terms: &[&str], categories: &[PoiCategory]) -> ActivityCatalog {
        ActivityCatalog {
            tier: FeatureTier::Base,
            terms: terms.iter().map(|t| (*t).to_string()).collect(),
            categories: categories.to_vec(),
        }
    }

    #[test]
    fn never_repeats_term_or_category_consecutively() {
        let catalog = catalog(
            &["Bar", "Club", "Walk"],
            &[PoiCategory::Cafe, PoiCategory::Park],
        );
        let mut randomizer = Randomizer::seeded(&catalog, 7);

        let mut current = randomizer.next_label(None);
        for _ in 0..500 {
            let next = randomizer.next_label(Some(&current));
            assert_ne!(next.term, current.term);
            assert_ne!(next.category, current.category);
            current = next;
        }
    }

    #[test]
    fn two_entry_catalog_alternates() {
        let catalog = catalog(&["Bar", "Club"], &[]);
        let mut randomizer = Randomizer::seeded(&catalog, 1);
        let first = randomizer.next_label(None);
        let second = randomizer.next_label(Some(&first));
        let third = randomizer.next_label(Some(&second));
        assert_ne!(first.term, second.term);
        assert_eq!(first.term, third.term);
    }

    #[test]
    fn single_entry_catalog_returns_only_element() {
        let catalog = catalog(&["Surfing"], &[PoiCategory::Beach]);
        let mut randomizer = Randomizer::seeded(&catalog, 3);
        let first = randomizer.next_label(None);
        let second = randomizer.next_label(Some(&first));
        assert_eq!(second.term, "Surfing");
        assert_eq!(second.category, Some(PoiCategory::Beach));
    }

    #[test]
    fn empty_category_catalog_yields_term_only_labels() {
        let catalog = catalog(&["Bar", "Club"], &[]);
        let mut randomizer = Randomizer::seeded(&catalog, 11);
        assert!(randomizer.next_label(None).category.is_none());
    }

    #[test]
    fn every_term_is_reachable() {
        let terms = ["Bar", "Club", "Walk", "Sport", "Surfing"];
        let catalog = catalog(&terms, &[]);
        let mut randomizer = Randomizer::seeded(&catalog, 42);

        let mut seen = HashSet::new();
        let mut current = randomizer.next_label(None);
        for _ in 0..200 {
            seen.insert(current.term.clone());
            current = randomizer.next_label(Some(&current));
        }
        assert_eq!(seen.len(), terms.len());
    }

    #[test]
    fn unknown_current_term_draws_from_full_catalog() {
        let catalog = catalog(&["Bar", "Club"], &[]);
        let mut randomizer = Randomizer::seeded(&catalog, 5);
        let stale = ActivityLabel {
            term: "Removed Term".to_string(),
            category: None,
        };
        let next = randomizer.next_label(Some(&stale));
        assert!(next.term == "Bar" || next.term == "Club");
    }

    #[test]
    #[should_panic(expected = "at least one term")]
    fn empty_catalog_panics_at_construction() {
        let _ = Randomizer::seeded(&catalog(&[], &[]), 0);
    }
}
