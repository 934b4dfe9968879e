//! Async actor that drives a [`SearchMachine`].
//!
//! One tokio task owns the machine and drains a single event channel fed by
//! the presentation layer, the location provider, and finished search
//! cycles. Search cycles run on their own tasks and report back on that same
//! channel, so the machine only ever has one writer.

use std::sync::Arc;

use datedice_core::{Coordinate, PermissionStatus, SearchRadius};
use datedice_places::PlaceSearch;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::cycle::run_search_cycle;
use crate::dedup::SearchResultSet;
use crate::error::EngineError;
use crate::location::{LocationProvider, LocationSink};
use crate::machine::{Effect, SearchMachine, Snapshot};

#[derive(Debug)]
pub(crate) enum Event {
    ChangeActivity,
    SetRadius(SearchRadius),
    RequestLocation,
    LocationUpdated(Option<Coordinate>),
    PermissionChanged(PermissionStatus),
    LocationFailed(String),
    SearchFinished { seq: u64, results: SearchResultSet },
    Shutdown,
}

pub struct Orchestrator {
    machine: SearchMachine,
    search: Arc<dyn PlaceSearch>,
    location: Arc<dyn LocationProvider>,
    events: mpsc::UnboundedReceiver<Event>,
    // Weak so the actor stops once every handle, sink and cycle is gone.
    events_tx: mpsc::WeakUnboundedSender<Event>,
    snapshot_tx: watch::Sender<Snapshot>,
}

impl Orchestrator {
    /// Start the actor on the current tokio runtime.
    ///
    /// The actor asks `location` for the permission status and, when
    /// allowed, a first fix before handling any command.
    #[must_use]
    pub fn spawn(
        machine: SearchMachine,
        search: Arc<dyn PlaceSearch>,
        location: Arc<dyn LocationProvider>,
    ) -> (OrchestratorHandle, JoinHandle<()>) {
        let (tx, events) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(machine.snapshot());

        let actor = Self {
            machine,
            search,
            location,
            events,
            events_tx: tx.downgrade(),
            snapshot_tx,
        };
        let task = tokio::spawn(actor.run());

        (OrchestratorHandle { tx, snapshot_rx }, task)
    }

    async fn run(mut self) {
        let permission = self.location.permission_status();
        tracing::info!(?permission, radius = %self.machine.radius(), "orchestrator started");

        let effect = self.machine.start(permission);
        self.execute(effect);
        self.publish();

        while let Some(event) = self.events.recv().await {
            let effect = match event {
                Event::Shutdown => break,
                Event::ChangeActivity => self.machine.change_activity(),
                Event::SetRadius(radius) => self.machine.set_radius(radius),
                Event::RequestLocation => self.machine.request_location(),
                Event::LocationUpdated(coordinate) => self.machine.on_location(coordinate),
                Event::PermissionChanged(status) => self.machine.on_permission(status),
                Event::LocationFailed(reason) => {
                    self.machine.on_location_failed(&reason);
                    None
                }
                Event::SearchFinished { seq, results } => {
                    if self.machine.on_search_finished(seq, results) {
                        tracing::info!(
                            seq,
                            state = ?self.machine.state(),
                            "search results applied"
                        );
                    }
                    None
                }
            };
            self.execute(effect);
            self.publish();
        }

        tracing::info!("orchestrator stopped");
    }

    fn execute(&self, effect: Option<Effect>) {
        let Some(effect) = effect else {
            return;
        };
        let Some(tx) = self.events_tx.upgrade() else {
            tracing::debug!(?effect, "event channel closed; dropping effect");
            return;
        };

        match effect {
            Effect::RequestLocation => {
                tracing::debug!("requesting location");
                self.location.request_location(LocationSink::new(tx));
            }
            Effect::Search(request) => {
                tracing::debug!(
                    seq = request.seq,
                    label = %request.label.title(),
                    radius = %request.radius,
                    "dispatching search cycle"
                );
                let search = Arc::clone(&self.search);
                tokio::spawn(async move {
                    let results = run_search_cycle(search.as_ref(), &request).await;
                    // The actor may have stopped while the cycle ran.
                    let _ = tx.send(Event::SearchFinished {
                        seq: request.seq,
                        results,
                    });
                });
            }
        }
    }

    fn publish(&self) {
        let next = self.machine.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Cloneable command and observation handle for a running orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    tx: mpsc::UnboundedSender<Event>,
    snapshot_rx: watch::Receiver<Snapshot>,
}

impl OrchestratorHandle {
    /// Reroll the activity and search for it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the orchestrator has stopped.
    pub fn change_activity(&self) -> Result<(), EngineError> {
        self.send(Event::ChangeActivity)
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the orchestrator has stopped.
    pub fn set_radius(&self, radius: SearchRadius) -> Result<(), EngineError> {
        self.send(Event::SetRadius(radius))
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the orchestrator has stopped.
    pub fn request_location(&self) -> Result<(), EngineError> {
        self.send(Event::RequestLocation)
    }

    /// Sink for pushing unsolicited location and permission updates.
    #[must_use]
    pub fn location_sink(&self) -> LocationSink {
        LocationSink::new(self.tx.clone())
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_rx.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`. The current
    /// snapshot is checked first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the orchestrator stops first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&Snapshot) -> bool,
    ) -> Result<Snapshot, EngineError> {
        let mut rx = self.snapshot_rx.clone();
        let snapshot = rx
            .wait_for(predicate)
            .await
            .map(|snapshot| snapshot.clone())
            .map_err(|_| EngineError::Closed);
        snapshot
    }

    /// Ask the actor to stop after the events already queued.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Closed`] if the orchestrator has already stopped.
    pub fn shutdown(&self) -> Result<(), EngineError> {
        self.send(Event::Shutdown)
    }

    fn send(&self, event: Event) -> Result<(), EngineError> {
        self.tx.send(event).map_err(|_| EngineError::Closed)
    }
}
