//! Place search providers for Date Dice.
//!
//! The engine only depends on the [`PlaceSearch`] trait. [`NominatimClient`]
//! is the bundled implementation backed by the OpenStreetMap Nominatim
//! search API.

pub mod error;
pub mod nominatim;
pub mod types;

mod retry;

use async_trait::async_trait;
use datedice_core::{PlaceCandidate, Region};

pub use error::PlaceSearchError;
pub use nominatim::NominatimClient;
pub use types::PlaceQuery;

/// Capability to look up places near a region.
///
/// Implementations may return candidates outside `region`; callers are
/// expected to post-filter.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Run one query scoped to `region`.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceSearchError`] when the provider cannot be reached or
    /// its response cannot be understood.
    async fn search(
        &self,
        query: &PlaceQuery,
        region: &Region,
    ) -> Result<Vec<PlaceCandidate>, PlaceSearchError>;
}
