//! Memoized compilation of canonical condition text.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use verdict_language::Node;
use verdict_vocabulary::segment::rewrite_plain;

/// Hit and miss counters for an [`ExpressionCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compile.
    pub misses: u64,
    /// Entries currently stored.
    pub entries: usize,
}

/// Thread-safe map from canonical text to compiled AST.
///
/// Keys are case-insensitive outside string literals; quoted text keeps its
/// case, so `"Hello"` and `"hello"` are separate entries. Entries stay until [`clear`](Self::clear); a
/// failed compile is never stored, so it is retried on the next lookup.
#[derive(Debug, Default)]
pub struct ExpressionCache {
    entries: Mutex<HashMap<String, Arc<Node>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ExpressionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached AST for `key`, compiling and storing it on a miss.
    ///
    /// The lock is held across lookup, compile and store, so concurrent
    /// callers with the same key compile it once.
    pub fn get_or_compile<F>(&self, key: &str, compile: F) -> Option<Arc<Node>>
    where
        F: FnOnce(&str) -> Option<Node>,
    {
        let normalized = normalize_key(key);
        let mut entries = self.lock();

        if let Some(ast) = entries.get(&normalized) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key, "expression cache hit");
            return Some(Arc::clone(ast));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key, "expression cache miss");
        let ast = Arc::new(compile(key)?);
        entries.insert(normalized, Arc::clone(&ast));
        Some(ast)
    }

    /// Returns the cached AST for `key` without compiling.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<Node>> {
        self.lock().get(&normalize_key(key)).cloned()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut entries = self.lock();
        debug!(entries = entries.len(), "clearing expression cache");
        entries.clear();
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Node>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lower-cases everything but quoted literals.
fn normalize_key(key: &str) -> String {
    rewrite_plain(key, str::to_lowercase)
}
