//! Retrieval Service
//!
//! Runs a normalized [`Filter`] through the content pipeline:
//! query the store, reconcile requested ids against what came back,
//! render every item and aggregate the cache metadata of the response.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use ejemplo_core::{
    CacheContract, ContentEntry, ContentItem, EjemploError, EjemploResult, Filter, NodeId,
    ResponsePayload, RetrievalResult,
};
use ejemplo_storage::{ContentQuery, ContentStore, Renderer};

use crate::telemetry::with_metrics;

/// A successful retrieval: the JSON payload and the cache contract that
/// travels with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieval {
    pub payload: ResponsePayload,
    pub cache: CacheContract,
}

/// Compare the requested ids with the items the store returned.
///
/// When the filter selects everything there is nothing to reconcile and
/// `missing_ids` stays empty.
pub fn reconcile(filter: &Filter, items: Vec<ContentItem>) -> RetrievalResult {
    let missing_ids = if filter.is_all() {
        BTreeSet::new()
    } else {
        let returned: BTreeSet<NodeId> = items.iter().map(|item| item.id).collect();
        filter
            .identifiers
            .difference(&returned)
            .copied()
            .collect()
    };

    RetrievalResult { items, missing_ids }
}

/// Content retrieval pipeline over injected collaborators.
#[derive(Clone)]
pub struct RetrievalService {
    store: Arc<dyn ContentStore>,
    renderer: Arc<dyn Renderer>,
}

impl RetrievalService {
    pub fn new(store: Arc<dyn ContentStore>, renderer: Arc<dyn Renderer>) -> Self {
        Self { store, renderer }
    }

    /// Query the store and reconcile the result.
    ///
    /// # Errors
    /// `NotFound` listing every requested id the store did not return, or a
    /// storage error.
    pub async fn retrieve(&self, filter: &Filter) -> EjemploResult<RetrievalResult> {
        let query = ContentQuery::for_filter(filter);

        let start = Instant::now();
        let queried = self.store.query(&query).await;
        let elapsed = start.elapsed().as_secs_f64();
        with_metrics(|metrics| metrics.record_store_query(queried.is_ok(), elapsed));
        let items = queried?;

        tracing::debug!(
            stage = "queried",
            conditions = query.conditions().len(),
            returned = items.len(),
            "Content store queried"
        );

        let result = reconcile(filter, items);
        tracing::debug!(
            stage = "reconciled",
            missing = result.missing_ids.len(),
            "Requested ids reconciled"
        );

        if !result.is_complete() {
            return Err(EjemploError::NotFound {
                missing: result.missing_ids.into_iter().collect(),
            });
        }
        Ok(result)
    }

    /// Render a reconciled result into the response payload, stamped now.
    pub fn assemble(&self, result: &RetrievalResult) -> EjemploResult<Retrieval> {
        self.assemble_at(result, chrono::Utc::now().timestamp())
    }

    /// Render a reconciled result into the response payload with an
    /// explicit timestamp.
    ///
    /// Cache metadata is taken from the loaded items before any rendering
    /// happens. `data` keeps store order.
    pub fn assemble_at(&self, result: &RetrievalResult, time: i64) -> EjemploResult<Retrieval> {
        let cache = CacheContract::aggregate(result.items.iter().map(|item| &item.cache));

        let mut data = Vec::with_capacity(result.items.len());
        for item in &result.items {
            let rendered = self.renderer.render(item)?;
            data.push(ContentEntry {
                title: item.title.clone(),
                content: rendered.trim().to_string(),
            });
        }
        tracing::debug!(stage = "rendered", items = data.len(), "Items rendered");

        let retrieval = Retrieval {
            payload: ResponsePayload {
                message: String::new(),
                data,
                time,
            },
            cache,
        };
        tracing::debug!(
            stage = "assembled",
            tags = retrieval.cache.tags().len(),
            max_age = i64::from(retrieval.cache.max_age()),
            "Response assembled"
        );
        Ok(retrieval)
    }

    /// Full pipeline for an already normalized filter.
    pub async fn execute(&self, filter: &Filter) -> EjemploResult<Retrieval> {
        let result = self.retrieve(filter).await?;
        self.assemble(&result)
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use ejemplo_test_utils::fixtures::article;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_missing_is_requested_minus_returned(
            requested in prop::collection::btree_set(1u64..200, 1..20),
            returned in prop::collection::btree_set(1u64..200, 0..20),
        ) {
            let filter = Filter::for_ids(requested.iter().copied().filter_map(NodeId::new), "en");
            let items = returned.iter().map(|id| article(*id, "en").item).collect();

            let result = reconcile(&filter, items);
            let missing: BTreeSet<u64> = result.missing_ids.iter().map(|id| id.get()).collect();
            let expected: BTreeSet<u64> = requested.difference(&returned).copied().collect();
            prop_assert_eq!(missing, expected);
        }

        #[test]
        fn prop_all_filter_never_misses(returned in prop::collection::btree_set(1u64..200, 0..20)) {
            let items = returned.iter().map(|id| article(*id, "en").item).collect();
            prop_assert!(reconcile(&Filter::all("en"), items).is_complete());
        }
    }
}
