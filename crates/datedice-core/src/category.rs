use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Capability level of the environment the catalog is loaded for.
///
/// Categories declared at a higher tier than the configured one are dropped
/// when the catalog is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureTier {
    #[default]
    Base,
    Extended,
}

impl std::str::FromStr for FeatureTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "extended" => Ok(Self::Extended),
            other => Err(CoreError::UnknownFeatureTier(other.to_string())),
        }
    }
}

impl std::fmt::Display for FeatureTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureTier::Base => write!(f, "base"),
            FeatureTier::Extended => write!(f, "extended"),
        }
    }
}

/// Structured point-of-interest categories understood by place search providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    Museum,
    Theater,
    Library,
    MovieTheater,
    Nightlife,
    Bakery,
    Brewery,
    Cafe,
    Restaurant,
    Winery,
    AmusementPark,
    Aquarium,
    Beach,
    Campground,
    Marina,
    NationalPark,
    Park,
    Zoo,
    MusicVenue,
    Planetarium,
    Castle,
    Fortress,
    Landmark,
    NationalMonument,
    Distillery,
    FoodMarket,
    Fairground,
    Bowling,
    GoKart,
    Hiking,
    MiniGolf,
    RockClimbing,
    Skating,
    Skiing,
    Fishing,
    Kayaking,
}

impl PoiCategory {
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Museum => "Museum",
            Self::Theater => "Theater",
            Self::Library => "Library",
            Self::MovieTheater => "Movie Theater",
            Self::Nightlife => "Nightlife",
            Self::Bakery => "Bakery",
            Self::Brewery => "Brewery",
            Self::Cafe => "Cafe",
            Self::Restaurant => "Restaurant",
            Self::Winery => "Winery",
            Self::AmusementPark => "Amusement Park",
            Self::Aquarium => "Aquarium",
            Self::Beach => "Beach",
            Self::Campground => "Campground",
            Self::Marina => "Marina",
            Self::NationalPark => "National Park",
            Self::Park => "Park",
            Self::Zoo => "Zoo",
            Self::MusicVenue => "Music Venue",
            Self::Planetarium => "Planetarium",
            Self::Castle => "Castle",
            Self::Fortress => "Fortress",
            Self::Landmark => "Landmark",
            Self::NationalMonument => "National Monument",
            Self::Distillery => "Distillery",
            Self::FoodMarket => "Food Market",
            Self::Fairground => "Fairground",
            Self::Bowling => "Bowling",
            Self::GoKart => "Go-Kart",
            Self::Hiking => "Hiking",
            Self::MiniGolf => "Mini Golf",
            Self::RockClimbing => "Rock Climbing",
            Self::Skating => "Skating",
            Self::Skiing => "Skiing",
            Self::Fishing => "Fishing",
            Self::Kayaking => "Kayaking",
        }
    }

    /// Phrase sent to providers that take a free-form POI type.
    #[must_use]
    pub fn search_phrase(self) -> String {
        match self {
            Self::Nightlife => "nightclub".to_string(),
            Self::GoKart => "karting".to_string(),
            other => other.display_name().to_lowercase(),
        }
    }
}

impl std::fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
