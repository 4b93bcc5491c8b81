use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Short-lived read cache keyed by resource and query parameters.
///
/// Entries older than the staleness window are treated as missing, so a
/// read after the window always goes back to the backend. Writes
/// invalidate every entry of the resource they touch.
pub struct QueryCache {
    ttl: Duration,
    entries: Mutex<HashMap<QueryKey, Entry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: &'static str,
    pub params: String,
}

impl QueryKey {
    pub fn new(resource: &'static str, params: impl Into<String>) -> Self {
        Self {
            resource,
            params: params.into(),
        }
    }

    pub fn all(resource: &'static str) -> Self {
        Self::new(resource, "")
    }
}

struct Entry {
    fetched_at: Instant,
    value: Arc<dyn Any + Send + Sync>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = entries
            .get(key)
            .is_some_and(|entry| entry.fetched_at.elapsed() < self.ttl);
        if !fresh {
            entries.remove(key);
            return None;
        }
        entries
            .get(key)
            .and_then(|entry| entry.value.downcast_ref::<T>())
            .cloned()
    }

    pub fn put<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            Entry {
                fetched_at: Instant::now(),
                value: Arc::new(value),
            },
        );
    }

    pub fn invalidate(&self, resource: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|key, _| key.resource != resource);
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
