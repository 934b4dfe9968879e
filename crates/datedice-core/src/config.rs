use crate::app_config::{AppConfig, Environment};
use crate::category::FeatureTier;
use crate::types::SearchRadius;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let env = parse_environment(&or_default("DATEDICE_ENV", "development"))?;
    let log_level = or_default("DATEDICE_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default(
        "DATEDICE_CATALOG_PATH",
        "./config/activities.yaml",
    ));

    let feature_tier = or_default("DATEDICE_FEATURE_TIER", "base")
        .parse::<FeatureTier>()
        .map_err(|e| invalid("DATEDICE_FEATURE_TIER", e.to_string()))?;

    let default_radius = SearchRadius::from_meters(parse_u32("DATEDICE_DEFAULT_RADIUS_M", "5000")?)
        .map_err(|e| invalid("DATEDICE_DEFAULT_RADIUS_M", e.to_string()))?;

    let location_threshold_m = or_default("DATEDICE_LOCATION_THRESHOLD_M", "25")
        .parse::<f64>()
        .map_err(|e| invalid("DATEDICE_LOCATION_THRESHOLD_M", e.to_string()))?;
    if !location_threshold_m.is_finite() || location_threshold_m < 0.0 {
        return Err(invalid(
            "DATEDICE_LOCATION_THRESHOLD_M",
            format!("must be a non-negative number, got {location_threshold_m}"),
        ));
    }

    let refresh_on_move = parse_bool("DATEDICE_REFRESH_ON_MOVE", "true")?;

    let search_base_url = or_default(
        "DATEDICE_SEARCH_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let search_user_agent = or_default(
        "DATEDICE_SEARCH_USER_AGENT",
        "datedice/0.1 (activity-roulette)",
    );
    let search_timeout_secs = parse_u64("DATEDICE_SEARCH_TIMEOUT_SECS", "15")?;
    let search_result_limit = parse_u32("DATEDICE_SEARCH_RESULT_LIMIT", "40")?;
    if !(1..=50).contains(&search_result_limit) {
        return Err(invalid(
            "DATEDICE_SEARCH_RESULT_LIMIT",
            format!("must be between 1 and 50, got {search_result_limit}"),
        ));
    }
    let search_max_retries = parse_u32("DATEDICE_SEARCH_MAX_RETRIES", "2")?;
    let search_backoff_base_ms = parse_u64("DATEDICE_SEARCH_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        env,
        log_level,
        catalog_path,
        feature_tier,
        default_radius,
        location_threshold_m,
        refresh_on_move,
        search_base_url,
        search_user_agent,
        search_timeout_secs,
        search_result_limit,
        search_max_retries,
        search_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DATEDICE_ENV".to_string(),
            reason: format!(
                "unrecognized environment '{other}'; expected development, test, or production"
            ),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
