use std::sync::Arc;
use std::time::Duration;

use datedice_core::{haversine_meters, load_catalog, AppConfig, Coordinate, SearchRadius};
use datedice_engine::{
    MachineSettings, Orchestrator, Randomizer, SearchMachine, SearchState, Snapshot,
    StaticLocationProvider,
};
use datedice_places::NominatimClient;

/// Public Nominatim allows one request per second; each roll sends two.
const ROLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub(crate) struct RollArgs {
    pub lat: f64,
    pub lon: f64,
    pub radius: Option<u32>,
    pub rolls: u32,
    pub json: bool,
}

/// Run `rolls` rerolls at a fixed position and print each result set.
///
/// # Errors
///
/// Returns an error for an invalid coordinate or radius, an unreadable
/// catalog, or if the orchestrator stops unexpectedly.
pub(crate) async fn run_roll(config: &AppConfig, args: RollArgs) -> anyhow::Result<()> {
    let center = Coordinate::new(args.lat, args.lon)?;
    let radius = args
        .radius
        .map(SearchRadius::from_meters)
        .transpose()?
        .unwrap_or(config.default_radius);

    let catalog = load_catalog(&config.catalog_path, config.feature_tier)?;
    tracing::info!(
        tier = %catalog.tier,
        terms = catalog.terms.len(),
        categories = catalog.categories.len(),
        "activity catalog loaded"
    );

    let settings = MachineSettings {
        radius,
        ..MachineSettings::from_config(config)
    };
    let machine = SearchMachine::new(Randomizer::from_catalog(&catalog), settings);
    let search = Arc::new(NominatimClient::from_config(config)?);
    let location = Arc::new(StaticLocationProvider::new(center));
    let (handle, task) = Orchestrator::spawn(machine, search, location);

    let initial = handle
        .wait_for(|s| {
            matches!(
                s.state,
                SearchState::Ready | SearchState::LocationDenied | SearchState::LocationFailed
            )
        })
        .await?;
    if initial.state != SearchState::Ready {
        anyhow::bail!("no usable location: {:?}", initial.state);
    }

    let mut snapshots = Vec::new();
    let mut last_applied = initial.applied_seq;
    for roll in 1..=args.rolls {
        if roll > 1 {
            tokio::time::sleep(ROLL_INTERVAL).await;
        }

        handle.change_activity()?;
        let snapshot = handle
            .wait_for(|s| s.applied_seq > last_applied && !s.is_loading)
            .await?;
        last_applied = snapshot.applied_seq;

        if !args.json {
            for line in format_roll(roll, center, &snapshot) {
                println!("{line}");
            }
        }
        snapshots.push(snapshot);
    }

    handle.shutdown()?;
    task.await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
    }
    Ok(())
}

pub(crate) fn format_roll(roll: u32, center: Coordinate, snapshot: &Snapshot) -> Vec<String> {
    let title = snapshot.title.as_deref().unwrap_or("?");
    let term = snapshot
        .label
        .as_ref()
        .map(|label| label.term.as_str())
        .unwrap_or_default();

    let mut lines = vec![format!(
        "roll {roll}: {title} (\"{term}\") within {} of {center}",
        snapshot.radius
    )];

    if snapshot.show_empty_indicator {
        lines.push("  no places found; roll again or try a larger --radius".to_string());
        lines.push(String::new());
        return lines;
    }

    lines.push(format!("  {:<40}{:>11}{:>13}{:>10}", "NAME", "LAT", "LON", "DIST"));
    for place in &snapshot.results {
        let distance = haversine_meters(center, place.coordinate);
        lines.push(format!(
            "  {:<40}{:>11.5}{:>13.5}{:>9.0}m",
            truncate(place.display_name(), 38),
            place.coordinate.latitude(),
            place.coordinate.longitude(),
            distance
        ));
    }
    lines.push(String::new());
    lines
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars - 3).collect::<String>())
    } else {
        text.to_string()
    }
}
