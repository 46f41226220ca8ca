use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use tokio::sync::OwnedMutexGuard;

/// Synced lyric text keyed by LRCLIB id, shared by every request.
///
/// Unbounded unless a capacity is configured, in which case the least recently
/// used entry is evicted. Also tracks which ids are being fetched right now so
/// that concurrent misses for the same id hit the remote service once.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, String>>,
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

/// Held while fetching one id; later callers for the same id wait on it.
pub struct FetchGuard<'a> {
    cache: &'a MemoryCache,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl MemoryCache {
    pub fn new(capacity: Option<usize>) -> Self {
        let entries = match capacity.and_then(NonZeroUsize::new) {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        Self {
            entries: Mutex::new(entries),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn in_flight(&self) -> MutexGuard<'_, HashMap<String, Arc<tokio::sync::Mutex<()>>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, id: &str) -> Option<String> {
        self.entries().get(id).cloned()
    }

    pub fn put(&self, id: &str, text: &str) {
        self.entries().put(id.to_string(), text.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Waits until no other caller is fetching `id`, then claims it.
    pub async fn claim_fetch(&self, id: &str) -> FetchGuard<'_> {
        let lock = self
            .in_flight()
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();

        FetchGuard {
            cache: self,
            key: id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut in_flight = self.cache.in_flight();
        // Only the table holds it once nobody is fetching or waiting.
        if in_flight
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            in_flight.remove(&self.key);
        }
    }
}
