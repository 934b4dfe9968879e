//! Query and response types for place search.

use datedice_core::{Coordinate, PlaceCandidate, PoiCategory};
use serde::Deserialize;

/// One search strategy: a free-text term or a structured category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceQuery {
    Text(String),
    Category(PoiCategory),
}

impl PlaceQuery {
    /// Short name of the strategy, used as a log field.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            PlaceQuery::Text(_) => "text",
            PlaceQuery::Category(_) => "category",
        }
    }
}

impl std::fmt::Display for PlaceQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceQuery::Text(term) => write!(f, "text:{term}"),
            PlaceQuery::Category(category) => write!(f, "category:{category}"),
        }
    }
}

/// A single item of a Nominatim `format=jsonv2` search response.
///
/// Nominatim encodes coordinates as strings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl NominatimPlace {
    /// Convert to a candidate, or `None` when the coordinates are unusable.
    ///
    /// Blank names fall back to the first component of `display_name`.
    pub(crate) fn into_candidate(self) -> Option<PlaceCandidate> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lon = self.lon.trim().parse::<f64>().ok()?;
        let coordinate = Coordinate::new(lat, lon).ok()?;

        let name = non_blank(self.name.as_deref()).or_else(|| {
            self.display_name
                .as_deref()
                .and_then(|d| non_blank(d.split(',').next()))
        });

        Some(PlaceCandidate::new(name, coordinate))
    }
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(lat: &str, lon: &str, name: Option<&str>, display: Option<&str>) -> NominatimPlace {
        NominatimPlace {
            lat: lat.to_string(),
            lon: lon.to_string(),
            name: name.map(str::to_string),
            display_name: display.map(str::to_string),
        }
    }

    #[test]
    fn converts_string_coordinates() {
        let candidate = place("37.80", "-122.40", Some("Tonga Room"), None)
            .into_candidate()
            .unwrap();
        assert_eq!(candidate.name.as_deref(), Some("Tonga Room"));
        assert!((candidate.coordinate.latitude() - 37.80).abs() < 1e-9);
        assert!((candidate.coordinate.longitude() + 122.40).abs() < 1e-9);
    }

    #[test]
    fn blank_name_falls_back_to_display_name() {
        let candidate = place(
            "37.80",
            "-122.40",
            Some("  "),
            Some("Dolores Park, Mission District, San Francisco"),
        )
        .into_candidate()
        .unwrap();
        assert_eq!(candidate.name.as_deref(), Some("Dolores Park"));
    }

    #[test]
    fn missing_names_yield_unnamed_candidate() {
        let candidate = place("1.0", "2.0", None, None).into_candidate().unwrap();
        assert!(candidate.name.is_none());
        assert_eq!(candidate.display_name(), "Unnamed place");
    }

    #[test]
    fn unparseable_coordinates_are_skipped() {
        assert!(place("north", "-122.40", Some("X"), None)
            .into_candidate()
            .is_none());
    }

    #[test]
    fn out_of_range_coordinates_are_skipped() {
        assert!(place("95.0", "0.0", Some("X"), None).into_candidate().is_none());
    }

    #[test]
    fn deserializes_jsonv2_item_with_extra_fields() {
        let json = r#"{
            "place_id": 1,
            "lat": "37.7952",
            "lon": "-122.4028",
            "category": "amenity",
            "type": "bar",
            "name": "Comstock Saloon",
            "display_name": "Comstock Saloon, 155, Columbus Avenue, San Francisco"
        }"#;
        let item: NominatimPlace = serde_json::from_str(json).unwrap();
        let candidate = item.into_candidate().unwrap();
        assert_eq!(candidate.name.as_deref(), Some("Comstock Saloon"));
    }

    #[test]
    fn query_display_and_strategy() {
        let text = PlaceQuery::Text("Club".to_string());
        assert_eq!(text.strategy(), "text");
        assert_eq!(text.to_string(), "text:Club");
        let category = PlaceQuery::Category(PoiCategory::Zoo);
        assert_eq!(category.strategy(), "category");
        assert_eq!(category.to_string(), "category:Zoo");
    }
}
