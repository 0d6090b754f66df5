//! In-process query result cache with per-entry expiry.
//!
//! Entries are whole serialized result lists keyed by the request's raw
//! parameter serialization; a read either returns a complete prior result or
//! nothing. There is no invalidation path from the property mutation
//! handlers, so results may be stale for up to the TTL window.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Default entry lifetime. Overridable via `CACHE_TTL_SECS`.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// String key/value store with a fixed TTL applied at write time.
///
/// Get/set are individually atomic; nothing coordinates the read-compute-write
/// sequence around a miss, so concurrent identical misses each recompute and
/// the last write wins.
pub struct QueryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a live entry. Expired entries behave as a miss and are pruned.
    /// A poisoned lock is surfaced as an error; the search path treats that
    /// as a failed request rather than falling back to store-only mode.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        {
            let entries = self
                .entries
                .read()
                .map_err(|_| anyhow!("query cache lock poisoned"))?;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Entry was expired; drop it under the write lock.
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("query cache lock poisoned"))?;
        if let Some(entry) = entries.get(key) {
            if entry.expires_at <= now {
                entries.remove(key);
            }
        }
        Ok(None)
    }

    /// Store a value under `key`, replacing any previous entry whole.
    pub fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("query cache lock poisoned"))?;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(())
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
