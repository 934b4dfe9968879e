//! The Search Orchestrator's state machine.
//!
//! Every transition is synchronous and returns the side effect, if any, that
//! the caller must run. The async actor in [`crate::orchestrator`] executes
//! effects and feeds their outcomes back in as further transitions.

use datedice_core::{
    camera_framing, ActivityLabel, AppConfig, CameraFraming, Coordinate, PermissionStatus,
    SearchRadius,
};
use serde::Serialize;

use crate::dedup::SearchResultSet;
use crate::location::{LocationChange, LocationTracker, DEFAULT_LOCATION_THRESHOLD_M};
use crate::randomizer::Randomizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    Idle,
    FetchingLocation,
    Ready,
    Searching,
    ResultsNonEmpty,
    ResultsEmpty,
    LocationDenied,
    LocationFailed,
}

/// Everything a search cycle needs, captured at dispatch time.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub seq: u64,
    pub label: ActivityLabel,
    pub center: Coordinate,
    pub radius: SearchRadius,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RequestLocation,
    Search(SearchRequest),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineSettings {
    pub radius: SearchRadius,
    pub location_threshold_m: f64,
    pub refresh_on_move: bool,
}

impl MachineSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            radius: config.default_radius,
            location_threshold_m: config.location_threshold_m,
            refresh_on_move: config.refresh_on_move,
        }
    }
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            radius: SearchRadius::default(),
            location_threshold_m: DEFAULT_LOCATION_THRESHOLD_M,
            refresh_on_move: true,
        }
    }
}

/// Read-only view published to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: SearchState,
    pub label: Option<ActivityLabel>,
    pub title: Option<String>,
    pub radius: SearchRadius,
    pub coordinate: Option<Coordinate>,
    pub permission: PermissionStatus,
    pub camera: Option<CameraFraming>,
    pub results: SearchResultSet,
    pub list_visible: bool,
    pub show_empty_indicator: bool,
    pub is_loading: bool,
    /// Sequence number of the cycle whose results are shown.
    pub applied_seq: Option<u64>,
}

pub struct SearchMachine {
    randomizer: Randomizer,
    tracker: LocationTracker,
    refresh_on_move: bool,
    state: SearchState,
    label: Option<ActivityLabel>,
    radius: SearchRadius,
    coordinate: Option<Coordinate>,
    permission: PermissionStatus,
    camera: Option<CameraFraming>,
    results: SearchResultSet,
    next_seq: u64,
    active_seq: Option<u64>,
    applied_seq: Option<u64>,
}

impl SearchMachine {
    #[must_use]
    pub fn new(randomizer: Randomizer, settings: MachineSettings) -> Self {
        Self {
            randomizer,
            tracker: LocationTracker::new(settings.location_threshold_m),
            refresh_on_move: settings.refresh_on_move,
            state: SearchState::Idle,
            label: None,
            radius: settings.radius,
            coordinate: None,
            permission: PermissionStatus::NotDetermined,
            camera: None,
            results: SearchResultSet::default(),
            next_seq: 1,
            active_seq: None,
            applied_seq: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state
    }

    #[must_use]
    pub fn label(&self) -> Option<&ActivityLabel> {
        self.label.as_ref()
    }

    #[must_use]
    pub fn radius(&self) -> SearchRadius {
        self.radius
    }

    pub fn start(&mut self, permission: PermissionStatus) -> Option<Effect> {
        self.permission = permission;
        if permission.is_denied() {
            self.state = SearchState::LocationDenied;
            return None;
        }
        if self.coordinate.is_some() {
            self.state = SearchState::Ready;
            None
        } else {
            self.fetch_location()
        }
    }

    pub fn request_location(&mut self) -> Option<Effect> {
        if self.permission.is_denied() {
            return None;
        }
        match self.state {
            SearchState::Idle | SearchState::LocationFailed => self.fetch_location(),
            SearchState::FetchingLocation if self.coordinate.is_none() => self.fetch_location(),
            _ => None,
        }
    }

    pub fn on_location(&mut self, update: Option<Coordinate>) -> Option<Effect> {
        match self.tracker.observe(update)? {
            LocationChange::Acquired(coordinate) => {
                self.set_coordinate(coordinate);
                None
            }
            LocationChange::Moved(coordinate) => {
                self.set_coordinate(coordinate);
                // A cycle still running was dispatched around the old center,
                // so it is superseded like a radius change.
                let has_results_or_search = matches!(
                    self.state,
                    SearchState::ResultsNonEmpty
                        | SearchState::ResultsEmpty
                        | SearchState::Searching
                );
                if self.refresh_on_move && has_results_or_search && self.label.is_some() {
                    tracing::debug!(%coordinate, "moved; refreshing results");
                    self.start_cycle()
                } else {
                    None
                }
            }
            LocationChange::Lost => {
                self.coordinate = None;
                self.camera = None;
                if !matches!(
                    self.state,
                    SearchState::LocationDenied | SearchState::Searching
                ) {
                    self.state = SearchState::Idle;
                    self.results = SearchResultSet::default();
                }
                None
            }
        }
    }

    pub fn on_location_failed(&mut self, reason: &str) {
        tracing::warn!(reason, state = ?self.state, "location request failed");
        if self.state == SearchState::FetchingLocation {
            self.state = SearchState::LocationFailed;
        }
    }

    pub fn on_permission(&mut self, status: PermissionStatus) -> Option<Effect> {
        self.permission = status;

        if status.is_denied() {
            if let Some(seq) = self.active_seq.take() {
                tracing::debug!(seq, "permission revoked; abandoning in-flight search");
            }
            self.state = SearchState::LocationDenied;
            return None;
        }

        if !status.is_authorized() {
            return None;
        }

        match self.state {
            SearchState::LocationDenied
            | SearchState::Idle
            | SearchState::FetchingLocation
            | SearchState::LocationFailed => {
                if self.coordinate.is_some() {
                    self.state = SearchState::Ready;
                    None
                } else {
                    self.fetch_location()
                }
            }
            _ => None,
        }
    }

    /// Reroll: pick a new label and search with it.
    ///
    /// Does nothing while a search is running, while denied, or before the
    /// first fix.
    pub fn change_activity(&mut self) -> Option<Effect> {
        if self.coordinate.is_none()
            || matches!(
                self.state,
                SearchState::Searching | SearchState::LocationDenied
            )
        {
            tracing::debug!(state = ?self.state, "reroll ignored");
            return None;
        }

        self.label = Some(self.randomizer.next_label(self.label.as_ref()));
        self.start_cycle()
    }

    /// Change the radius. With a label already rolled this refreshes the
    /// results, superseding any search still in flight.
    pub fn set_radius(&mut self, radius: SearchRadius) -> Option<Effect> {
        if radius == self.radius {
            return None;
        }
        self.radius = radius;

        let coordinate = self.coordinate?;
        self.camera = Some(camera_framing(coordinate, radius));

        if self.label.is_some() && self.state != SearchState::LocationDenied {
            self.start_cycle()
        } else {
            None
        }
    }

    /// Apply a finished cycle. Returns `false` when `seq` is stale and the
    /// results were discarded.
    pub fn on_search_finished(&mut self, seq: u64, results: SearchResultSet) -> bool {
        if self.active_seq != Some(seq) {
            tracing::debug!(seq, active = ?self.active_seq, "discarding stale search results");
            return false;
        }

        self.active_seq = None;
        self.applied_seq = Some(seq);
        self.state = if results.is_empty() {
            SearchState::ResultsEmpty
        } else {
            SearchState::ResultsNonEmpty
        };
        self.results = results;
        true
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            label: self.label.clone(),
            title: self.label.as_ref().map(|label| label.title().to_owned()),
            radius: self.radius,
            coordinate: self.coordinate,
            permission: self.permission,
            camera: self.camera,
            results: self.results.clone(),
            list_visible: !self.results.is_empty(),
            show_empty_indicator: self.state == SearchState::ResultsEmpty,
            is_loading: self.state == SearchState::Searching,
            applied_seq: self.applied_seq,
        }
    }

    fn fetch_location(&mut self) -> Option<Effect> {
        self.state = SearchState::FetchingLocation;
        Some(Effect::RequestLocation)
    }

    fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.coordinate = Some(coordinate);
        self.camera = Some(camera_framing(coordinate, self.radius));
        if matches!(
            self.state,
            SearchState::Idle | SearchState::FetchingLocation | SearchState::LocationFailed
        ) {
            self.state = SearchState::Ready;
        }
    }

    fn start_cycle(&mut self) -> Option<Effect> {
        let center = self.coordinate?;
        let label = self.label.clone()?;

        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(superseded) = self.active_seq.replace(seq) {
            tracing::debug!(superseded, seq, "search superseded");
        }
        self.state = SearchState::Searching;

        Some(Effect::Search(SearchRequest {
            seq,
            label,
            center,
            radius: self.radius,
        }))
    }
}

#[cfg(test)]
#[path = "machine_test.rs"]
mod tests;
