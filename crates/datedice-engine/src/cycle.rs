//! One search cycle: fan out the text and category queries, join, filter,
//! merge.

use datedice_core::{search_bounds, search_region, BoundingBox, PlaceCandidate, Region};
use datedice_places::{PlaceQuery, PlaceSearch};

use crate::dedup::{merge, SearchResultSet};
use crate::machine::SearchRequest;

/// Run both query strategies for `request` and return the merged results.
///
/// A failing strategy is logged and counts as zero results, so the other
/// strategy can still populate the set. Free-text results come first.
pub async fn run_search_cycle(
    search: &dyn PlaceSearch,
    request: &SearchRequest,
) -> SearchResultSet {
    let region = search_region(request.center, request.radius);
    let bounds = search_bounds(request.center, request.radius);

    let text_query = PlaceQuery::Text(request.label.term.clone());
    let category_query = request.label.category.map(PlaceQuery::Category);

    let text = run_strategy(search, &text_query, &region);
    let category = async {
        match &category_query {
            Some(query) => run_strategy(search, query, &region).await,
            None => Vec::new(),
        }
    };
    let (text, category) = futures::join!(text, category);

    let text = within(&bounds, text);
    let category = within(&bounds, category);
    let (text_count, category_count) = (text.len(), category.len());

    let results = merge([text, category]);

    tracing::debug!(
        seq = request.seq,
        label = %request.label.title(),
        text = text_count,
        category = category_count,
        merged = results.len(),
        "search cycle complete"
    );

    results
}

async fn run_strategy(
    search: &dyn PlaceSearch,
    query: &PlaceQuery,
    region: &Region,
) -> Vec<PlaceCandidate> {
    match search.search(query, region).await {
        Ok(places) => places,
        Err(e) => {
            tracing::warn!(
                strategy = query.strategy(),
                %query,
                error = %e,
                "place search failed; treating as no results"
            );
            Vec::new()
        }
    }
}

fn within(bounds: &BoundingBox, places: Vec<PlaceCandidate>) -> Vec<PlaceCandidate> {
    places
        .into_iter()
        .filter(|place| bounds.contains(&place.coordinate))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use datedice_core::{ActivityLabel, Coordinate, PoiCategory, SearchRadius};
    use datedice_places::PlaceSearchError;

    use super::*;

    struct FixedSearch {
        text: Vec<PlaceCandidate>,
        category: Vec<PlaceCandidate>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PlaceSearch for FixedSearch {
        async fn search(
            &self,
            query: &PlaceQuery,
            _region: &Region,
        ) -> Result<Vec<PlaceCandidate>, PlaceSearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(match query {
                PlaceQuery::Text(_) => self.text.clone(),
                PlaceQuery::Category(_) => self.category.clone(),
            })
        }
    }

    fn place(name: &str, lat: f64, lon: f64) -> PlaceCandidate {
        PlaceCandidate::new(Some(name.to_string()), Coordinate::new(lat, lon).unwrap())
    }

    fn request(category: Option<PoiCategory>) -> SearchRequest {
        SearchRequest {
            seq: 1,
            label: ActivityLabel {
                term: "Club".to_string(),
                category,
            },
            center: Coordinate::new(37.7858, -122.4064).unwrap(),
            radius: SearchRadius::FiveKm,
        }
    }

    #[tokio::test]
    async fn text_results_precede_category_results_and_outliers_are_dropped() {
        let search = FixedSearch {
            text: vec![place("X", 37.80, -122.40), place("Y", 37.90, -122.40)],
            category: vec![place("X", 37.80, -122.40), place("Z", 37.81, -122.41)],
            queries: Mutex::new(Vec::new()),
        };

        let results = run_search_cycle(&search, &request(Some(PoiCategory::Nightlife))).await;

        let names: Vec<_> = results.iter().map(PlaceCandidate::display_name).collect();
        assert_eq!(names, vec!["X", "Z"]);
    }

    #[tokio::test]
    async fn label_without_category_sends_only_text_query() {
        let search = FixedSearch {
            text: vec![place("X", 37.80, -122.40)],
            category: vec![place("Z", 37.81, -122.41)],
            queries: Mutex::new(Vec::new()),
        };

        let results = run_search_cycle(&search, &request(None)).await;

        assert_eq!(results.len(), 1);
        assert_eq!(*search.queries.lock().unwrap(), vec!["text:Club".to_string()]);
    }
}
