//! Shared domain model for Date Dice.
//!
//! Holds the value types every other crate speaks (coordinates, radii, POI
//! categories, place candidates), the geo math that turns a search radius
//! into map geometry, and configuration loading for both the environment and
//! the YAML activity catalog.

pub mod app_config;
pub mod catalog;
pub mod category;
pub mod config;
pub mod geo;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, parse_catalog, ActivityCatalog, CatalogFile};
pub use category::{FeatureTier, PoiCategory};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{
    camera_framing, haversine_meters, meters_to_lat_delta, search_bounds, search_region,
    BoundingBox, CameraFraming, Region, EARTH_RADIUS_METERS,
};
pub use types::{ActivityLabel, Coordinate, PermissionStatus, PlaceCandidate, SearchRadius};

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        reason: &'static str,
    },

    #[error("unsupported search radius {0} m; expected one of 1000, 5000, 10000, 20000")]
    UnsupportedRadius(u32),

    #[error("unknown feature tier '{0}'; expected 'base' or 'extended'")]
    UnknownFeatureTier(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
