//
//  datamall
//  api/cache.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! Response Cache
//!
//! A small in-memory TTL cache for page bodies, keyed by the request that
//! produced them: the endpoint URL plus the serialized wire parameters
//! (including the `$skip` cursor, so every page caches independently).
//!
//! # Semantics
//!
//! - The expiry of an entry is fixed at insertion time from the
//!   `cache_duration` the endpoint supplied; a duration of 0 never reaches
//!   the cache at all (the pipeline bypasses it).
//! - Only successful page bodies are stored; faults and HTTP errors are
//!   never cached.
//! - The store is bounded: expired entries are pruned on insertion, and
//!   beyond [`CACHE_MAXSIZE`](crate::constants::CACHE_MAXSIZE) entries
//!   arbitrary ones are evicted.
//!
//! # Concurrency
//!
//! The store sits behind a mutex and is shared by clones of the owning
//! client, so concurrent top-level requests serialize their cache access.
//! A poisoned lock degrades to cache misses rather than panicking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::Value as JsonValue;

use crate::api::params::WireParams;

/// Cache key: the endpoint URL plus the exact wire parameters of the page.
type CacheKey = (String, WireParams);

/// One cached page body with its expiry instant.
#[derive(Debug, Clone)]
struct CacheEntry {
    body: JsonValue,
    expires_at: Instant,
}

/// In-memory TTL cache for decoded page bodies.
///
/// Cheap to clone; clones share one store.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    max_entries: usize,
    store: Arc<Mutex<HashMap<CacheKey, CacheEntry>>>,
}

impl ResponseCache {
    /// Creates an empty cache bounded to `max_entries`.
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            store: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the cached body for `url` + `params` if a fresh entry exists.
    pub fn get(&self, url: &str, params: &WireParams) -> Option<JsonValue> {
        let store = self.store.lock().ok()?;
        let entry = store.get(&(url.to_string(), params.clone()))?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        Some(entry.body.clone())
    }

    /// Stores a page body under `url` + `params` for `cache_duration` seconds.
    ///
    /// A zero duration is a no-op; the caller is expected to bypass the
    /// cache entirely for uncached endpoints.
    pub fn insert(&self, url: &str, params: &WireParams, body: JsonValue, cache_duration: u64) {
        if cache_duration == 0 {
            return;
        }
        let Ok(mut store) = self.store.lock() else {
            return;
        };

        let now = Instant::now();
        store.retain(|_, entry| entry.expires_at > now);
        while store.len() >= self.max_entries {
            let Some(key) = store.keys().next().cloned() else {
                break;
            };
            store.remove(&key);
        }

        store.insert(
            (url.to_string(), params.clone()),
            CacheEntry {
                body,
                expires_at: now + Duration::from_secs(cache_duration),
            },
        );
    }

    /// Number of live entries, for diagnostics and tests.
    pub fn len(&self) -> usize {
        self.store.lock().map(|store| store.len()).unwrap_or(0)
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
