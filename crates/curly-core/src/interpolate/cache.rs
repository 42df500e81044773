//! Per-context memo of the last evaluated values and result

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::context::{Context, ContextId};

/// Identifies whose evaluation a cache entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A context carrying an identity
    Context(ContextId),
    /// Shared slot for contexts without an identity
    Anonymous,
}

impl CacheKey {
    pub fn for_context(ctx: &dyn Context) -> Self {
        ctx.id().map_or(CacheKey::Anonymous, CacheKey::Context)
    }
}

/// Counters describing how often the memo was used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Evaluations answered from the memo
    pub hits: u64,
    /// Evaluations that rebuilt the result
    pub recomputes: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub values: Arc<Vec<String>>,
    pub result: Arc<str>,
}

#[derive(Debug, Default)]
pub(crate) struct EvaluationCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    hits: AtomicU64,
    recomputes: AtomicU64,
}

impl EvaluationCache {
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        // Entries are replaced whole, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self, key: CacheKey) -> Option<CacheEntry> {
        self.entries().get(&key).cloned()
    }

    pub fn store(&self, key: CacheKey, entry: CacheEntry) {
        self.entries().insert(key, entry);
        self.recomputes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn remove(&self, key: CacheKey) -> bool {
        self.entries().remove(&key).is_some()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries().keys().copied().collect()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            recomputes: self.recomputes.load(Ordering::Relaxed),
        }
    }
}
