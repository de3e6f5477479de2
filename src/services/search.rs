// src/services/search.rs
// DOCUMENTATION: Multi-source restaurant search
// PURPOSE: Run name/attribute/item lookups and merge them without duplicates

use crate::db::RestaurantSource;
use crate::errors::QEatsError;
use crate::models::{RestaurantRecord, RestaurantView};
use crate::services::{ProximityFilter, ProximityQuery};
use chrono::NaiveTime;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default size of the per-request task group
pub const DEFAULT_SEARCH_WORKERS: usize = 4;

/// The four independent lookup groups, in merge order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchCategory {
    Name,
    Attribute,
    ItemName,
    ItemAttribute,
}

impl SearchCategory {
    pub const ALL: [SearchCategory; 4] = [
        SearchCategory::Name,
        SearchCategory::Attribute,
        SearchCategory::ItemName,
        SearchCategory::ItemAttribute,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchCategory::Name => "name",
            SearchCategory::Attribute => "attribute",
            SearchCategory::ItemName => "item_name",
            SearchCategory::ItemAttribute => "item_attribute",
        }
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the four groups are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    Sequential,
    #[default]
    Concurrent,
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(SearchStrategy::Sequential),
            "concurrent" => Ok(SearchStrategy::Concurrent),
            other => Err(format!("unknown search strategy '{}'", other)),
        }
    }
}

/// First-occurrence-wins merge keyed by restaurant identifier
#[derive(Default)]
struct UniqueViews {
    seen: HashSet<String>,
    views: Vec<RestaurantView>,
}

impl UniqueViews {
    fn extend(&mut self, views: impl IntoIterator<Item = RestaurantView>) {
        for view in views {
            if self.seen.insert(view.restaurant_id.clone()) {
                self.views.push(view);
            }
        }
    }

    fn into_views(self) -> Vec<RestaurantView> {
        self.views
    }
}

/// Raw store results for one group, each batch in merge order
async fn fetch_category(
    source: &dyn RestaurantSource,
    category: SearchCategory,
    text: &str,
) -> Result<Vec<Vec<RestaurantRecord>>, QEatsError> {
    let batches = match category {
        SearchCategory::Name => vec![
            source.fetch_by_name_exact(text).await?,
            source.fetch_by_name_containing(text).await?,
        ],
        SearchCategory::Attribute => vec![
            source.fetch_by_attribute_exact(text).await?,
            source.fetch_by_attribute_containing(text).await?,
        ],
        // Item-level lookups reuse the restaurant-level queries; menu items
        // are not searched yet.
        SearchCategory::ItemName => vec![source.fetch_by_name_exact(text).await?],
        SearchCategory::ItemAttribute => vec![source.fetch_by_attribute_exact(text).await?],
    };

    Ok(batches)
}

/// One group, filtered and deduplicated
async fn search_category(
    source: &dyn RestaurantSource,
    category: SearchCategory,
    text: &str,
    query: &ProximityQuery,
) -> Result<Vec<RestaurantView>, QEatsError> {
    let batches = fetch_category(source, category, text).await?;

    let mut merged = UniqueViews::default();
    for batch in &batches {
        merged.extend(ProximityFilter::admitted_views(batch, query));
    }

    let views = merged.into_views();
    log::debug!("Search group '{}' admitted {} restaurants", category, views.len());
    Ok(views)
}

/// Search aggregator
/// DOCUMENTATION: Output order is [name-exact, name-containing,
/// attribute-exact, attribute-containing, item-name, item-attribute] with
/// later duplicates dropped. Both strategies produce identical output.
pub struct SearchAggregator {
    source: Arc<dyn RestaurantSource>,
    workers: usize,
}

impl SearchAggregator {
    pub fn new(source: Arc<dyn RestaurantSource>, workers: usize) -> Self {
        Self {
            source,
            workers: workers.max(1),
        }
    }

    pub async fn search(
        &self,
        strategy: SearchStrategy,
        latitude: f64,
        longitude: f64,
        text: &str,
        current_time: NaiveTime,
        radius_km: f64,
    ) -> Result<Vec<RestaurantView>, QEatsError> {
        match strategy {
            SearchStrategy::Sequential => {
                self.search_sequential(latitude, longitude, text, current_time, radius_km)
                    .await
            }
            SearchStrategy::Concurrent => {
                self.search_concurrent(latitude, longitude, text, current_time, radius_km)
                    .await
            }
        }
    }

    /// Run the groups one after another on the caller's task
    ///
    /// An empty query short-circuits to no results. Any store failure fails
    /// the whole search.
    pub async fn search_sequential(
        &self,
        latitude: f64,
        longitude: f64,
        text: &str,
        current_time: NaiveTime,
        radius_km: f64,
    ) -> Result<Vec<RestaurantView>, QEatsError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let query = ProximityQuery::new(latitude, longitude, current_time, radius_km);
        let mut merged = UniqueViews::default();

        for category in SearchCategory::ALL {
            let views = search_category(self.source.as_ref(), category, text, &query).await?;
            merged.extend(views);
        }

        let views = merged.into_views();
        log::info!("Sequential search '{}': {} restaurants", text, views.len());
        Ok(views)
    }

    /// Run the groups as a private task group of at most `workers` at a time
    ///
    /// Results are merged in submission order, so the output matches
    /// `search_sequential`. A failing group contributes nothing and is logged;
    /// the search only fails when every group failed.
    pub async fn search_concurrent(
        &self,
        latitude: f64,
        longitude: f64,
        text: &str,
        current_time: NaiveTime,
        radius_km: f64,
    ) -> Result<Vec<RestaurantView>, QEatsError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let query = ProximityQuery::new(latitude, longitude, current_time, radius_km);
        let permits = Arc::new(Semaphore::new(self.workers));

        // Dropping the set (client gone) aborts every group still running
        let mut group: JoinSet<(usize, Result<Vec<RestaurantView>, QEatsError>)> = JoinSet::new();
        for (slot, category) in SearchCategory::ALL.into_iter().enumerate() {
            let source = Arc::clone(&self.source);
            let permits = Arc::clone(&permits);
            let text = text.to_string();

            group.spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(_permit) => search_category(source.as_ref(), category, &text, &query).await,
                    Err(e) => Err(QEatsError::SubSearch {
                        category: category.to_string(),
                        message: e.to_string(),
                    }),
                };
                (slot, outcome)
            });
        }

        // Completion order is arbitrary; slots restore submission order
        let mut outcomes: Vec<Option<Result<Vec<RestaurantView>, QEatsError>>> =
            SearchCategory::ALL.iter().map(|_| None).collect();
        while let Some(joined) = group.join_next().await {
            match joined {
                Ok((slot, outcome)) => outcomes[slot] = Some(outcome),
                Err(join_err) => log::error!("Search task for '{}' did not finish: {}", text, join_err),
            }
        }

        let mut merged = UniqueViews::default();
        let mut failures = Vec::new();

        for (category, outcome) in SearchCategory::ALL.into_iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|| {
                Err(QEatsError::SubSearch {
                    category: category.to_string(),
                    message: "task aborted".to_string(),
                })
            });

            match outcome {
                Ok(views) => merged.extend(views),
                Err(e) => {
                    log::error!("Search group '{}' failed for '{}': {}", category, text, e);
                    failures.push(e);
                }
            }
        }

        if failures.len() == SearchCategory::ALL.len() {
            log::error!("All search groups failed for '{}'", text);
            return Err(failures.swap_remove(0));
        }

        let views = merged.into_views();
        log::info!(
            "Concurrent search '{}': {} restaurants ({} groups failed)",
            text,
            views.len(),
            failures.len()
        );
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use std::time::Duration;

    fn dataset() -> Vec<RestaurantRecord> {
        vec![
            restaurant("1", "Pizza", &["Italian"], 1.0),
            restaurant("2", "Pizza Hut", &["Fast Food"], 1.5),
            restaurant("3", "Napoli", &["pizza", "Italian"], 2.0),
            restaurant("4", "Slice Town", &["Pizzeria"], 2.5),
            restaurant("5", "Pizza Far", &["pizza"], 20.0),
            restaurant("6", "Dosa Camp", &["South Indian"], 1.0),
        ]
    }

    fn aggregator(source: Arc<InMemorySource>) -> SearchAggregator {
        SearchAggregator::new(source, DEFAULT_SEARCH_WORKERS)
    }

    fn ids(views: &[RestaurantView]) -> Vec<&str> {
        views.iter().map(|v| v.restaurant_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_sequential_merge_order_and_dedup() {
        let search = aggregator(Arc::new(InMemorySource::new(dataset())));

        let views = search
            .search_sequential(ORIGIN_LAT, ORIGIN_LON, "pizza", at(12, 0, 0), 5.0)
            .await
            .unwrap();

        // "1" is both name-exact and name-containing, "3" both attribute
        // groups; each appears once at its first position
        assert_eq!(ids(&views), vec!["1", "2", "3", "4"]);
    }

    #[tokio::test]
    async fn test_sequential_and_concurrent_agree() {
        let search = aggregator(Arc::new(InMemorySource::new(dataset())));

        for text in ["pizza", "PIZZA", "italian", "dosa", "nothing"] {
            let sequential = search
                .search_sequential(ORIGIN_LAT, ORIGIN_LON, text, at(12, 0, 0), 5.0)
                .await
                .unwrap();
            let concurrent = search
                .search_concurrent(ORIGIN_LAT, ORIGIN_LON, text, at(12, 0, 0), 5.0)
                .await
                .unwrap();

            assert_eq!(ids(&sequential), ids(&concurrent), "query {}", text);
        }
    }

    #[tokio::test]
    async fn test_empty_query_returns_nothing() {
        let search = aggregator(Arc::new(InMemorySource::new(dataset())));

        for strategy in [SearchStrategy::Sequential, SearchStrategy::Concurrent] {
            let views = search
                .search(strategy, ORIGIN_LAT, ORIGIN_LON, "", at(12, 0, 0), 5.0)
                .await
                .unwrap();
            assert!(views.is_empty());
        }
    }

    #[tokio::test]
    async fn test_results_are_filtered_by_radius_and_hours() {
        let search = aggregator(Arc::new(InMemorySource::new(dataset())));

        let peak = search
            .search_sequential(ORIGIN_LAT, ORIGIN_LON, "pizza", at(9, 30, 0), 1.8)
            .await
            .unwrap();
        assert_eq!(ids(&peak), vec!["1", "2"]);

        let closed = search
            .search_concurrent(ORIGIN_LAT, ORIGIN_LON, "pizza", at(8, 0, 0), 5.0)
            .await
            .unwrap();
        assert!(closed.is_empty());
    }

    #[tokio::test]
    async fn test_failing_group_is_isolated() {
        let source = Arc::new(InMemorySource::new(dataset()));
        source.fail(Lookup::AttributeContaining);
        let search = aggregator(source);

        let views = search
            .search_concurrent(ORIGIN_LAT, ORIGIN_LON, "pizza", at(12, 0, 0), 5.0)
            .await
            .unwrap();

        // "4" only matches by attribute substring; "3" still comes through
        // the item-attribute group
        assert_eq!(ids(&views), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_sequential_propagates_store_failure() {
        let source = Arc::new(InMemorySource::new(dataset()));
        source.fail(Lookup::AttributeContaining);
        let search = aggregator(source);

        let result = search
            .search_sequential(ORIGIN_LAT, ORIGIN_LON, "pizza", at(12, 0, 0), 5.0)
            .await;
        assert!(matches!(result, Err(QEatsError::SourceFetch(_))));
    }

    #[tokio::test]
    async fn test_concurrent_fails_when_every_group_fails() {
        let source = Arc::new(InMemorySource::new(dataset()));
        source.fail(Lookup::NameExact);
        source.fail(Lookup::AttributeExact);
        let search = aggregator(source);

        let result = search
            .search_concurrent(ORIGIN_LAT, ORIGIN_LON, "pizza", at(12, 0, 0), 5.0)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_single_worker_keeps_submission_order() {
        let search = SearchAggregator::new(Arc::new(InMemorySource::new(dataset())), 1);

        let views = search
            .search_concurrent(ORIGIN_LAT, ORIGIN_LON, "pizza", at(12, 0, 0), 5.0)
            .await
            .unwrap();
        assert_eq!(ids(&views), vec!["1", "2", "3", "4"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_merge_follows_submission_not_completion() {
        let source = Arc::new(InMemorySource::new(dataset()));
        // Name finishes last, Attribute second to last
        source.delay(Lookup::NameContaining, Duration::from_millis(150));
        source.delay(Lookup::AttributeContaining, Duration::from_millis(60));
        let search = aggregator(source);

        let sequential = search
            .search_sequential(ORIGIN_LAT, ORIGIN_LON, "pizza", at(12, 0, 0), 5.0)
            .await
            .unwrap();
        let concurrent = search
            .search_concurrent(ORIGIN_LAT, ORIGIN_LON, "pizza", at(12, 0, 0), 5.0)
            .await
            .unwrap();

        assert_eq!(ids(&concurrent), vec!["1", "2", "3", "4"]);
        assert_eq!(ids(&sequential), ids(&concurrent));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dropped_search_aborts_running_groups() {
        let source = Arc::new(InMemorySource::new(dataset()));
        source.delay(Lookup::NameContaining, Duration::from_millis(200));
        let search = aggregator(source.clone());

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            search.search_concurrent(ORIGIN_LAT, ORIGIN_LON, "pizza", at(12, 0, 0), 5.0),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(source.answered(Lookup::NameContaining), 0);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("sequential".parse::<SearchStrategy>(), Ok(SearchStrategy::Sequential));
        assert_eq!(" Concurrent ".parse::<SearchStrategy>(), Ok(SearchStrategy::Concurrent));
        assert!("parallel".parse::<SearchStrategy>().is_err());
        assert_eq!(SearchStrategy::default(), SearchStrategy::Concurrent);
    }
}
