//! Location provider seam and edge-triggered location tracking.

use datedice_core::{haversine_meters, Coordinate, PermissionStatus};
use tokio::sync::mpsc;

use crate::error::EngineError;
use crate::orchestrator::Event;

/// Default minimum movement, in meters, before a new fix counts as a move.
pub const DEFAULT_LOCATION_THRESHOLD_M: f64 = 25.0;

/// Supplies the device position and location permission.
///
/// `request_location` is fire-and-forget: the provider answers later through
/// the [`LocationSink`], possibly more than once.
pub trait LocationProvider: Send + Sync {
    fn permission_status(&self) -> PermissionStatus;

    fn request_location(&self, sink: LocationSink);
}

/// Write side of the orchestrator's event channel for location providers.
#[derive(Debug, Clone)]
pub struct LocationSink {
    tx: mpsc::UnboundedSender<Event>,
}

impl LocationSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }

    /// Report a fix, or `None` when the position is no longer known.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the orchestrator has stopped.
    pub fn deliver(&self, coordinate: Option<Coordinate>) -> Result<(), EngineError> {
        self.send(Event::LocationUpdated(coordinate))
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the orchestrator has stopped.
    pub fn permission_changed(&self, status: PermissionStatus) -> Result<(), EngineError> {
        self.send(Event::PermissionChanged(status))
    }

    /// Report that a requested fix could not be obtained.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the orchestrator has stopped.
    pub fn failed(&self, reason: impl Into<String>) -> Result<(), EngineError> {
        self.send(Event::LocationFailed(reason.into()))
    }

    fn send(&self, event: Event) -> Result<(), EngineError> {
        self.tx.send(event).map_err(|_| EngineError::Closed)
    }
}

/// A location update that passed the tracker's edge filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationChange {
    /// First fix after having none.
    Acquired(Coordinate),
    /// Moved further than the threshold from the last accepted fix.
    Moved(Coordinate),
    Lost,
}

/// Filters raw location deliveries down to meaningful changes.
///
/// Providers tend to redeliver the same fix; without this filter every
/// redelivery would retrigger camera and search work.
#[derive(Debug, Clone)]
pub struct LocationTracker {
    threshold_m: f64,
    last: Option<Coordinate>,
}

impl LocationTracker {
    /// Negative or non-finite thresholds are treated as zero.
    #[must_use]
    pub fn new(threshold_m: f64) -> Self {
        let threshold_m = if threshold_m.is_finite() {
            threshold_m.max(0.0)
        } else {
            0.0
        };
        Self {
            threshold_m,
            last: None,
        }
    }

    #[must_use]
    pub fn last(&self) -> Option<Coordinate> {
        self.last
    }

    /// Feed one delivery. Returns `None` when nothing meaningful changed.
    ///
    /// Small moves are measured against the last *accepted* fix, so slow
    /// drift still registers once it adds up past the threshold.
    pub fn observe(&mut self, update: Option<Coordinate>) -> Option<LocationChange> {
        match (self.last, update) {
            (None, None) => None,
            (Some(_), None) => {
                self.last = None;
                Some(LocationChange::Lost)
            }
            (None, Some(next)) => {
                self.last = Some(next);
                Some(LocationChange::Acquired(next))
            }
            (Some(prev), Some(next)) => {
                if haversine_meters(prev, next) > self.threshold_m {
                    self.last = Some(next);
                    Some(LocationChange::Moved(next))
                } else {
                    None
                }
            }
        }
    }
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION_THRESHOLD_M)
    }
}

/// Provider for a fixed position, used by the CLI and in tests.
#[derive(Debug, Clone)]
pub struct StaticLocationProvider {
    coordinate: Option<Coordinate>,
    permission: PermissionStatus,
}

impl StaticLocationProvider {
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
            permission: PermissionStatus::AuthorizedWhenInUse,
        }
    }

    /// A provider that has permission but never obtains a fix.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            coordinate: None,
            permission: PermissionStatus::AuthorizedWhenInUse,
        }
    }

    #[must_use]
    pub fn with_permission(mut self, permission: PermissionStatus) -> Self {
        self.permission = permission;
        self
    }
}

impl LocationProvider for StaticLocationProvider {
    fn permission_status(&self) -> PermissionStatus {
        self.permission
    }

    fn request_location(&self, sink: LocationSink) {
        let sent = if self.permission.is_denied() {
            sink.permission_changed(self.permission)
        } else {
            match self.coordinate {
                Some(coordinate) => sink.deliver(Some(coordinate)),
                None => sink.failed("no position available"),
            }
        };

        if let Err(e) = sent {
            tracing::debug!(error = %e, "location reply dropped");
        }
    }
}
