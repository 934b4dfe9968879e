use datedice_core::{
    ActivityCatalog, ActivityLabel, Coordinate, FeatureTier, PermissionStatus, PlaceCandidate,
    PoiCategory, SearchRadius,
};
use datedice_engine::{merge, SearchResultSet, SearchState, Snapshot};

use super::*;

#[test]
fn parses_roll_with_defaults() {
    let cli = Cli::try_parse_from(["datedice", "roll", "--lat", "37.78", "--lon", "-122.4"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Roll {
            radius: None,
            rolls: 1,
            json: false,
            ..
        }
    ));
}

#[test]
fn parses_roll_with_all_flags() {
    let cli = Cli::try_parse_from([
        "datedice", "roll", "--lat", "-33.86", "--lon", "151.21", "--radius", "10000", "--rolls",
        "3", "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Roll {
            lat,
            lon,
            radius,
            rolls,
            json,
        } => {
            assert!((lat + 33.86).abs() < f64::EPSILON);
            assert!((lon - 151.21).abs() < f64::EPSILON);
            assert_eq!(radius, Some(10_000));
            assert_eq!(rolls, 3);
            assert!(json);
        }
        Commands::Catalog { .. } => panic!("expected roll"),
    }
}

#[test]
fn roll_requires_coordinates() {
    assert!(Cli::try_parse_from(["datedice", "roll", "--lat", "1.0"]).is_err());
}

#[test]
fn roll_rejects_zero_rolls() {
    assert!(Cli::try_parse_from([
        "datedice", "roll", "--lat", "1", "--lon", "2", "--rolls", "0"
    ])
    .is_err());
}

#[test]
fn parses_catalog_json() {
    let cli = Cli::try_parse_from(["datedice", "catalog", "--json"]).unwrap();
    assert!(matches!(cli.command, Commands::Catalog { json: true }));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["datedice"]).is_err());
}

fn sf() -> Coordinate {
    Coordinate::new(37.7858, -122.4064).unwrap()
}

fn snapshot(state: SearchState, results: SearchResultSet) -> Snapshot {
    let label = ActivityLabel {
        term: "Club".to_string(),
        category: Some(PoiCategory::Nightlife),
    };
    Snapshot {
        state,
        title: Some(label.title().to_string()),
        label: Some(label),
        radius: SearchRadius::FiveKm,
        coordinate: Some(sf()),
        permission: PermissionStatus::AuthorizedWhenInUse,
        camera: None,
        list_visible: !results.is_empty(),
        show_empty_indicator: state == SearchState::ResultsEmpty,
        is_loading: false,
        applied_seq: Some(1),
        results,
    }
}

#[test]
fn roll_output_lists_places_with_distance() {
    let results = merge([vec![
        PlaceCandidate::new(Some("Monarch".to_string()), sf()),
        PlaceCandidate::new(None, Coordinate::new(37.80, -122.40).unwrap()),
    ]]);
    let lines = roll::format_roll(2, sf(), &snapshot(SearchState::ResultsNonEmpty, results));

    assert!(lines[0].starts_with("roll 2: Nightlife (\"Club\") within 5 km of"));
    assert!(lines[1].contains("NAME"));
    assert!(lines[2].contains("Monarch"));
    assert!(lines[2].trim_end().ends_with(" 0m"));
    assert!(lines[3].contains("Unnamed place"));
}

#[test]
fn roll_output_reports_empty_results() {
    let lines = roll::format_roll(
        1,
        sf(),
        &snapshot(SearchState::ResultsEmpty, SearchResultSet::default()),
    );
    assert!(lines[1].contains("no places found"));
}

#[test]
fn catalog_output_lists_terms_and_categories() {
    let catalog = ActivityCatalog {
        tier: FeatureTier::Base,
        terms: vec!["Bar".to_string(), "Walk".to_string()],
        categories: vec![PoiCategory::MovieTheater],
    };
    let lines = catalog::format_catalog(&catalog);

    assert_eq!(lines[0], "tier: base");
    assert!(lines.contains(&"terms (2):".to_string()));
    assert!(lines.contains(&"  Walk".to_string()));
    assert!(lines.contains(&"categories (1):".to_string()));
    assert!(lines
        .iter()
        .any(|l| l.contains("Movie Theater") && l.ends_with("movie theater")));
}
