use std::path::PathBuf;

use crate::category::FeatureTier;
use crate::types::SearchRadius;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub feature_tier: FeatureTier,
    pub default_radius: SearchRadius,
    /// Minimum movement in meters before a new fix counts as a location change.
    pub location_threshold_m: f64,
    pub refresh_on_move: bool,
    pub search_base_url: String,
    pub search_user_agent: String,
    pub search_timeout_secs: u64,
    pub search_result_limit: u32,
    pub search_max_retries: u32,
    pub search_backoff_base_ms: u64,
}
