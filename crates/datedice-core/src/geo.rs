//! Radius-to-degree conversions for search regions and camera framing.
//!
//! Degrees are treated as isotropic: one meter maps to the same angular delta
//! on both axes, so the search box is square in degree space.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::types::{Coordinate, SearchRadius};

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Camera framing widens the search radius by this factor so the search
/// circle stays on screen with a margin.
const CAMERA_RADIUS_FACTOR: f64 = 25.0 / 9.0;

/// A map region: center plus full angular extent on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinate,
    pub lat_span_deg: f64,
    pub lon_span_deg: f64,
}

/// The map camera's visible region.
pub type CameraFraming = Region;

impl Region {
    /// Box spanning half the region's extent on each side of the center.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(
            self.center,
            self.lat_span_deg / 2.0,
            self.lon_span_deg / 2.0,
        )
    }
}

/// Inclusive latitude/longitude ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn around(center: Coordinate, lat_delta: f64, lon_delta: f64) -> Self {
        Self {
            min_lat: center.latitude() - lat_delta,
            max_lat: center.latitude() + lat_delta,
            min_lon: center.longitude() - lon_delta,
            max_lon: center.longitude() + lon_delta,
        }
    }

    #[must_use]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coordinate.latitude())
            && (self.min_lon..=self.max_lon).contains(&coordinate.longitude())
    }
}

/// Convert a distance in meters to degrees of latitude.
#[must_use]
pub fn meters_to_lat_delta(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_METERS) * (180.0 / PI)
}

/// Region sent to the place search provider; both spans equal the radius delta.
#[must_use]
pub fn search_region(center: Coordinate, radius: SearchRadius) -> Region {
    let delta = meters_to_lat_delta(f64::from(radius.meters()));
    Region {
        center,
        lat_span_deg: delta,
        lon_span_deg: delta,
    }
}

/// Post-filter box applied to provider results: `center ± delta` on both axes.
#[must_use]
pub fn search_bounds(center: Coordinate, radius: SearchRadius) -> BoundingBox {
    let delta = meters_to_lat_delta(f64::from(radius.meters()));
    BoundingBox::around(center, delta, delta)
}

#[must_use]
pub fn camera_framing(center: Coordinate, radius: SearchRadius) -> CameraFraming {
    let span = meters_to_lat_delta(f64::from(radius.meters()) * CAMERA_RADIUS_FACTOR);
    Region {
        center,
        lat_span_deg: span,
        lon_span_deg: span,
    }
}

/// Great-circle distance between two coordinates in meters.
#[must_use]
pub fn haversine_meters(a: Coordinate, b: Coordinate) -> f64 {
    let to_rad = |deg: f64| deg * PI / 180.0;

    let dlat = to_rad(b.latitude() - a.latitude());
    let dlon = to_rad(b.longitude() - a.longitude());

    let h = (dlat / 2.0).sin().powi(2)
        + to_rad(a.latitude()).cos() * to_rad(b.latitude()).cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}
