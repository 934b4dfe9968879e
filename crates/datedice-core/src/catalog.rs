use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::{FeatureTier, PoiCategory};
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermGroup {
    pub theme: String,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: PoiCategory,
    #[serde(default)]
    pub tier: FeatureTier,
}

/// On-disk shape of `config/activities.yaml`.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub term_groups: Vec<TermGroup>,
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
}

/// Catalog resolved for one feature tier, ready for the randomizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCatalog {
    pub tier: FeatureTier,
    pub terms: Vec<String>,
    pub categories: Vec<PoiCategory>,
}

impl ActivityCatalog {
    /// Flatten a validated catalog file, keeping categories at or below `tier`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the file fails validation.
    pub fn from_file(file: &CatalogFile, tier: FeatureTier) -> Result<Self, ConfigError> {
        validate_catalog(file)?;

        let terms = file
            .term_groups
            .iter()
            .flat_map(|group| group.terms.iter())
            .map(|term| term.trim().to_string())
            .collect();
        let categories = file
            .categories
            .iter()
            .filter(|entry| entry.tier <= tier)
            .map(|entry| entry.category)
            .collect();

        Ok(Self {
            tier,
            terms,
            categories,
        })
    }
}

/// Load and validate the activity catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path, tier: FeatureTier) -> Result<ActivityCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalog(&content, tier)
}

/// Parse catalog YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML cannot be parsed or fails validation.
pub fn parse_catalog(yaml: &str, tier: FeatureTier) -> Result<ActivityCatalog, ConfigError> {
    let file: CatalogFile = serde_yaml::from_str(yaml)?;
    ActivityCatalog::from_file(&file, tier)
}

fn validate_catalog(file: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_terms = HashSet::new();
    let mut term_count = 0usize;

    for group in &file.term_groups {
        if group.theme.trim().is_empty() {
            return Err(ConfigError::Validation(
                "term group theme must be non-empty".to_string(),
            ));
        }
        if group.terms.is_empty() {
            return Err(ConfigError::Validation(format!(
                "term group '{}' has no terms",
                group.theme
            )));
        }
        for term in &group.terms {
            if term.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "term group '{}' contains a blank term",
                    group.theme
                )));
            }
            if !seen_terms.insert(term.trim().to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate term: '{}'",
                    term.trim()
                )));
            }
            term_count += 1;
        }
    }

    if term_count == 0 {
        return Err(ConfigError::Validation(
            "catalog must contain at least one term".to_string(),
        ));
    }

    let mut seen_categories = HashSet::new();
    for entry in &file.categories {
        if !seen_categories.insert(entry.category) {
            return Err(ConfigError::Validation(format!(
                "duplicate category: '{}'",
                entry.category.display_name()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
