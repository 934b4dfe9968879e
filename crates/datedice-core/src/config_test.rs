use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn assert_invalid(map: &HashMap<&str, &str>, expected_var: &str) {
    let result = build_app_config(lookup_from_map(map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected_var),
        "expected InvalidEnvVar({expected_var}), got: {result:?}"
    );
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "DATEDICE_ENV"));
}

#[test]
fn build_app_config_defaults() {
    let map = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.catalog_path.to_string_lossy(),
        "./config/activities.yaml"
    );
    assert_eq!(cfg.feature_tier, FeatureTier::Base);
    assert_eq!(cfg.default_radius, SearchRadius::FiveKm);
    assert!((cfg.location_threshold_m - 25.0).abs() < f64::EPSILON);
    assert!(cfg.refresh_on_move);
    assert_eq!(cfg.search_base_url, "https://nominatim.openstreetmap.org");
    assert_eq!(cfg.search_user_agent, "datedice/0.1 (activity-roulette)");
    assert_eq!(cfg.search_timeout_secs, 15);
    assert_eq!(cfg.search_result_limit, 40);
    assert_eq!(cfg.search_max_retries, 2);
    assert_eq!(cfg.search_backoff_base_ms, 500);
}

#[test]
fn feature_tier_override() {
    let mut map = HashMap::new();
    map.insert("DATEDICE_FEATURE_TIER", "extended");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.feature_tier, FeatureTier::Extended);
}

#[test]
fn feature_tier_invalid() {
    let mut map = HashMap::new();
    map.insert("DATEDICE_FEATURE_TIER", "ios18");
    assert_invalid(&map, "DATEDICE_FEATURE_TIER");
}

#[test]
fn default_radius_override() {
    let mut map = HashMap::new();
    map.insert("DATEDICE_DEFAULT_RADIUS_M", "20000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.default_radius, SearchRadius::TwentyKm);
}

#[test]
fn default_radius_outside_set_is_rejected() {
    let mut map = HashMap::new();
    map.insert("DATEDICE_DEFAULT_RADIUS_M", "500");
    assert_invalid(&map, "DATEDICE_DEFAULT_RADIUS_M");
}

#[test]
fn default_radius_not_a_number() {
    let mut map = HashMap::new();
    map.insert("DATEDICE_DEFAULT_RADIUS_M", "five");
    assert_invalid(&map, "DATEDICE_DEFAULT_RADIUS_M");
}

#[test]
fn location_threshold_negative_is_rejected() {
    let mut map = HashMap::new();
    map.insert("DATEDICE_LOCATION_THRESHOLD_M", "-1");
    assert_invalid(&map, "DATEDICE_LOCATION_THRESHOLD_M");
}

#[test]
fn location_threshold_override() {
    let mut map = HashMap::new();
    map.insert("DATEDICE_LOCATION_THRESHOLD_M", "2.5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.location_threshold_m - 2.5).abs() < f64::EPSILON);
}

#[test]
fn refresh_on_move_accepts_common_spellings() {
    for (raw, expected) in [("false", false), ("0", false), ("YES", true), ("on", true)] {
        let mut map = HashMap::new();
        map.insert("DATEDICE_REFRESH_ON_MOVE", raw);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.refresh_on_move, expected, "raw value {raw}");
    }
}

#[test]
fn refresh_on_move_invalid() {
    let mut map = HashMap::new();
    map.insert("DATEDICE_REFRESH_ON_MOVE", "sometimes");
    assert_invalid(&map, "DATEDICE_REFRESH_ON_MOVE");
}

#[test]
fn search_result_limit_out_of_range() {
    let mut map = HashMap::new();
    map.insert("DATEDICE_SEARCH_RESULT_LIMIT", "0");
    assert_invalid(&map, "DATEDICE_SEARCH_RESULT_LIMIT");

    map.insert("DATEDICE_SEARCH_RESULT_LIMIT", "51");
    assert_invalid(&map, "DATEDICE_SEARCH_RESULT_LIMIT");
}

#[test]
fn search_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("DATEDICE_SEARCH_TIMEOUT_SECS", "not-a-number");
    assert_invalid(&map, "DATEDICE_SEARCH_TIMEOUT_SECS");
}

#[test]
fn search_retry_overrides() {
    let mut map = HashMap::new();
    map.insert("DATEDICE_SEARCH_MAX_RETRIES", "0");
    map.insert("DATEDICE_SEARCH_BACKOFF_BASE_MS", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_max_retries, 0);
    assert_eq!(cfg.search_backoff_base_ms, 50);
}
