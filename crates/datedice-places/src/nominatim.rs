//! HTTP client for the OpenStreetMap Nominatim `/search` endpoint.
//!
//! Free-text queries go out as `q=<term>`; category queries use Nominatim's
//! structured `amenity=<phrase>` parameter. Every request is bounded to the
//! region's viewbox.

use std::time::Duration;

use async_trait::async_trait;
use datedice_core::{AppConfig, PlaceCandidate, Region};
use reqwest::{Client, Url};

use crate::error::PlaceSearchError;
use crate::retry::retry_with_backoff;
use crate::types::{NominatimPlace, PlaceQuery};
use crate::PlaceSearch;

const DEFAULT_RESULT_LIMIT: u32 = 40;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// Client for a Nominatim-compatible search API.
///
/// Use [`NominatimClient::from_config`] in the application or
/// [`NominatimClient::new`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    search_url: Url,
    result_limit: u32,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NominatimClient {
    /// Creates a client with default result limit and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceSearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlaceSearchError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, PlaceSearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends rather than replaces
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&normalised)
            .and_then(|base| base.join("search"))
            .map_err(|e| PlaceSearchError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            search_url,
            result_limit: DEFAULT_RESULT_LIMIT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Creates a client from the `DATEDICE_SEARCH_*` settings.
    ///
    /// # Errors
    ///
    /// See [`NominatimClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlaceSearchError> {
        Ok(Self::new(
            &config.search_base_url,
            config.search_timeout_secs,
            &config.search_user_agent,
        )?
        .with_result_limit(config.search_result_limit)
        .with_retry_policy(config.search_max_retries, config.search_backoff_base_ms))
    }

    #[must_use]
    pub fn with_result_limit(mut self, limit: u32) -> Self {
        self.result_limit = limit;
        self
    }

    /// `max_retries` is the number of additional attempts after the first
    /// transient failure. Set to `0` to disable retries.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(&self, query: &PlaceQuery, region: &Region) -> Url {
        let bbox = region.bounding_box();
        let west = bbox.min_lon.max(-180.0);
        let east = bbox.max_lon.min(180.0);
        let north = bbox.max_lat.min(90.0);
        let south = bbox.min_lat.max(-90.0);
        let viewbox = format!("{west:.6},{north:.6},{east:.6},{south:.6}");

        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("format", "jsonv2")
                .append_pair("limit", &self.result_limit.to_string())
                .append_pair("bounded", "1")
                .append_pair("viewbox", &viewbox);
            match query {
                PlaceQuery::Text(term) => {
                    pairs.append_pair("q", term);
                }
                PlaceQuery::Category(category) => {
                    pairs.append_pair("amenity", &category.search_phrase());
                }
            }
        }
        url
    }

    async fn fetch_places(&self, url: &Url) -> Result<Vec<NominatimPlace>, PlaceSearchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(PlaceSearchError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(PlaceSearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlaceSearchError::Deserialize {
            context: format!("nominatim search ({url})"),
            source: e,
        })
    }
}

#[async_trait]
impl PlaceSearch for NominatimClient {
    async fn search(
        &self,
        query: &PlaceQuery,
        region: &Region,
    ) -> Result<Vec<PlaceCandidate>, PlaceSearchError> {
        let url = self.build_url(query, region);
        tracing::debug!(strategy = query.strategy(), %query, %url, "nominatim search");

        let places = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.fetch_places(&url)
        })
        .await?;

        let raw_count = places.len();
        let candidates: Vec<PlaceCandidate> = places
            .into_iter()
            .filter_map(NominatimPlace::into_candidate)
            .collect();

        if candidates.len() < raw_count {
            tracing::debug!(
                strategy = query.strategy(),
                skipped = raw_count - candidates.len(),
                "skipped nominatim items with unusable coordinates"
            );
        }

        Ok(candidates)
    }
}

#[cfg(test)]
#[path = "nominatim_test.rs"]
mod tests;
