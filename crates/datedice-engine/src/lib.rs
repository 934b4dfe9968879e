//! Search-and-deduplication engine for Date Dice.
//!
//! [`SearchMachine`] holds every state transition as plain synchronous code
//! and reports side effects as [`Effect`] values. [`Orchestrator`] wraps it
//! in a single tokio task that executes those effects (location requests,
//! search cycles) and publishes a [`Snapshot`] after every event.

pub mod cycle;
pub mod dedup;
pub mod error;
pub mod location;
pub mod machine;
pub mod orchestrator;
pub mod randomizer;

pub use cycle::run_search_cycle;
pub use dedup::{merge, SearchResultSet};
pub use error::EngineError;
pub use location::{
    LocationChange, LocationProvider, LocationSink, LocationTracker, StaticLocationProvider,
    DEFAULT_LOCATION_THRESHOLD_M,
};
pub use machine::{Effect, MachineSettings, SearchMachine, SearchRequest, SearchState, Snapshot};
pub use orchestrator::{Orchestrator, OrchestratorHandle};
pub use randomizer::Randomizer;
