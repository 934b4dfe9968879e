//! Value types shared by the engine, the place search adapters and the CLI.

use serde::{Deserialize, Serialize};

use crate::category::PoiCategory;
use crate::CoreError;

/// A WGS84 position in degrees.
///
/// Latitude is always within `[-90, 90]` and longitude within `[-180, 180]`;
/// the only way to build one (including deserialization) goes through
/// [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoreError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Build a coordinate, rejecting NaN and out-of-range components.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when either component is not
    /// finite or falls outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let invalid = |reason| CoreError::InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid("components must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// The fixed set of search radii offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SearchRadius {
    OneKm,
    #[default]
    FiveKm,
    TenKm,
    TwentyKm,
}

impl SearchRadius {
    /// Every supported radius, smallest first.
    pub const ALL: [SearchRadius; 4] = [
        SearchRadius::OneKm,
        SearchRadius::FiveKm,
        SearchRadius::TenKm,
        SearchRadius::TwentyKm,
    ];

    /// Parse a radius given in meters.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnsupportedRadius`] for anything outside the fixed set.
    pub fn from_meters(meters: u32) -> Result<Self, CoreError> {
        match meters {
            1_000 => Ok(Self::OneKm),
            5_000 => Ok(Self::FiveKm),
            10_000 => Ok(Self::TenKm),
            20_000 => Ok(Self::TwentyKm),
            other => Err(CoreError::UnsupportedRadius(other)),
        }
    }

    #[must_use]
    pub fn meters(self) -> u32 {
        match self {
            Self::OneKm => 1_000,
            Self::FiveKm => 5_000,
            Self::TenKm => 10_000,
            Self::TwentyKm => 20_000,
        }
    }
}

impl TryFrom<u32> for SearchRadius {
    type Error = CoreError;

    fn try_from(meters: u32) -> Result<Self, Self::Error> {
        Self::from_meters(meters)
    }
}

impl From<SearchRadius> for u32 {
    fn from(radius: SearchRadius) -> Self {
        radius.meters()
    }
}

impl std::fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} km", self.meters() / 1_000)
    }
}

/// Location permission as reported by the platform's location service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    #[default]
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl PermissionStatus {
    /// `Restricted` counts as denied: the user cannot grant access from the app.
    #[must_use]
    pub fn is_denied(self) -> bool {
        matches!(self, Self::Denied | Self::Restricted)
    }

    #[must_use]
    pub fn is_authorized(self) -> bool {
        matches!(self, Self::AuthorizedWhenInUse | Self::AuthorizedAlways)
    }
}

/// A place returned by a search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: Option<String>,
    pub coordinate: Coordinate,
}

impl PlaceCandidate {
    #[must_use]
    pub fn new(name: Option<String>, coordinate: Coordinate) -> Self {
        Self { name, coordinate }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed place")
    }
}

/// The activity currently rolled: a free-text term plus, when the category
/// catalog is non-empty, a structured POI category for the same roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLabel {
    pub term: String,
    pub category: Option<PoiCategory>,
}

impl ActivityLabel {
    /// Title shown to the user. The structured category wins when present.
    #[must_use]
    pub fn title(&self) -> &str {
        match self.category {
            Some(category) => category.display_name(),
            None => &self.term,
        }
    }
}
