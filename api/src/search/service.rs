//! Read-through cached search over the property store.

use super::compiler::compile;
use super::types::PredicateMap;
use crate::cache::QueryCache;
use crate::database::properties::Property;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Store seam for property queries. `Database` implements this; tests inject
/// counting doubles through it.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Fetch properties matching the predicate mapping. When `favorites_of`
    /// is set, results are additionally restricted to that user's favorited
    /// property ids.
    async fn query_properties(
        &self,
        predicates: &PredicateMap,
        favorites_of: Option<i64>,
    ) -> Result<Vec<Property>>;
}

/// Orchestrates one search request: cache key, cache read, on miss compile +
/// store query + cache write.
///
/// Both dependencies are injected at construction; there is no global state.
/// Concurrent identical requests racing on a miss are not deduplicated: each
/// queries the store and writes the cache, last write wins.
pub struct SearchService<S> {
    store: Arc<S>,
    cache: Arc<QueryCache>,
}

impl<S: PropertyStore> SearchService<S> {
    pub fn new(store: Arc<S>, cache: Arc<QueryCache>) -> Self {
        Self { store, cache }
    }

    /// Public property search over the full catalog.
    pub async fn search_properties(&self, params: &[(String, String)]) -> Result<Vec<Property>> {
        let key = format!("properties:{}", serialize_params(params)?);
        self.search(&key, params, None).await
    }

    /// Favorites search: the same algorithm with a user-scoped cache key and
    /// an implicit membership constraint merged into the store query.
    pub async fn search_favorites(
        &self,
        user_id: i64,
        params: &[(String, String)],
    ) -> Result<Vec<Property>> {
        let key = format!("favorites:{}:{}", user_id, serialize_params(params)?);
        self.search(&key, params, Some(user_id)).await
    }

    async fn search(
        &self,
        key: &str,
        params: &[(String, String)],
        favorites_of: Option<i64>,
    ) -> Result<Vec<Property>> {
        if let Some(cached) = self.cache.get(key)? {
            tracing::debug!(key, "search cache hit");
            return Ok(serde_json::from_str(&cached)?);
        }

        let predicates = compile(params);
        let results = self.store.query_properties(&predicates, favorites_of).await?;
        self.cache.set(key, serde_json::to_string(&results)?)?;
        tracing::debug!(key, results = results.len(), "search cache filled");
        Ok(results)
    }
}

/// Cache key payload: the exact pair list, order-sensitive by design. Two
/// logically identical filters written in a different parameter order do not
/// share an entry; bounded duplicate caching, not a correctness issue.
fn serialize_params(params: &[(String, String)]) -> Result<String> {
    Ok(serde_json::to_string(params)?)
}
