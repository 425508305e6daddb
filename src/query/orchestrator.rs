//! Composes filtering and sorting into a single view-state query.
//!
//! [`apply_query`] is the pure composition. [`QueryOrchestrator`] adds the
//! property collection cache and last-request-wins sequencing needed when
//! queries are issued faster than the repository answers (search as you
//! type).

use super::filter::{matches, FilterSpec};
use super::sort::{sort_in_place, SortKey};
use crate::domain::Property;
use crate::error::PropertyResult;
use crate::services::PropertySource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Filter then sort. Same inputs always give the same output.
pub fn apply_query(properties: &[Property], spec: &FilterSpec, key: SortKey) -> Vec<Property> {
    let mut result: Vec<Property> = properties
        .iter()
        .filter(|p| matches(p, spec))
        .cloned()
        .collect();
    sort_in_place(&mut result, key);
    result
}

/// Result of an applied query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Sequence number of the request that produced this result
    pub request: u64,
    /// Matching properties in display order
    pub properties: Vec<Property>,
    /// Size of the unfiltered collection
    pub total: usize,
}

/// Outcome of a submitted query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// This was still the latest request when it completed
    Applied(QueryResult),
    /// A newer request was issued while this one was in flight
    Superseded { request: u64, latest: u64 },
}

impl QueryOutcome {
    /// The result, if it was not superseded
    pub fn applied(self) -> Option<QueryResult> {
        match self {
            Self::Applied(result) => Some(result),
            Self::Superseded { .. } => None,
        }
    }
}

/// Cached collection, tagged with how many times it has been invalidated
#[derive(Default)]
struct CacheSlot {
    generation: u64,
    properties: Option<Arc<Vec<Property>>>,
}

/// Runs queries against an injected property source
pub struct QueryOrchestrator {
    source: Arc<dyn PropertySource>,
    cache: RwLock<CacheSlot>,
    latest: AtomicU64,
}

impl QueryOrchestrator {
    /// Create an orchestrator over a property source
    pub fn new(source: Arc<dyn PropertySource>) -> Self {
        Self {
            source,
            cache: RwLock::new(CacheSlot::default()),
            latest: AtomicU64::new(0),
        }
    }

    /// The property collection, loaded once and cached for the session.
    ///
    /// A load that overlaps an [`invalidate`](Self::invalidate) is returned
    /// but not cached.
    pub async fn properties(&self) -> PropertyResult<Arc<Vec<Property>>> {
        let generation = {
            let slot = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = &slot.properties {
                return Ok(cached.clone());
            }
            slot.generation
        };

        let loaded = Arc::new(self.source.get_all().await?);
        tracing::info!("Loaded {} properties", loaded.len());

        let mut slot = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if slot.generation != generation {
            tracing::debug!("Property collection invalidated during load, not caching");
            return Ok(loaded);
        }
        Ok(slot.properties.get_or_insert_with(|| loaded).clone())
    }

    /// Drop the cached collection so the next query reloads it
    pub fn invalidate(&self) {
        let mut slot = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        slot.generation += 1;
        slot.properties = None;
    }

    /// Sequence number of the most recently issued request
    pub fn latest_request(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Issue a query. Only the most recently issued request may apply.
    pub async fn submit(&self, spec: &FilterSpec, key: SortKey) -> PropertyResult<QueryOutcome> {
        let request = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(request, sort = %key, "Submitting listings query");

        let loaded = self.properties().await;

        let latest = self.latest_request();
        if latest != request {
            tracing::debug!(request, latest, "Discarding superseded query");
            return Ok(QueryOutcome::Superseded { request, latest });
        }

        let properties = loaded?;
        let result = apply_query(&properties, spec, key);
        tracing::debug!(
            request,
            matched = result.len(),
            total = properties.len(),
            "Query applied"
        );

        Ok(QueryOutcome::Applied(QueryResult {
            request,
            properties: result,
            total: properties.len(),
        }))
    }
}
