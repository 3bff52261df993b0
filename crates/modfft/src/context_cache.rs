//! Thread-safe cache of transform contexts keyed by table capacity.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::context::FftContext;
use crate::options::FftOptions;

/// Cache of built contexts, one per normalized maximum length.
///
/// Lets callers that work at several sizes share tables instead of rebuilding
/// them for every multiplication.
pub struct ContextCache {
    contexts: Mutex<HashMap<usize, Arc<FftContext>>>,
    max_entries: usize,
}

impl ContextCache {
    /// Create a new cache holding at most `max_entries` contexts.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            contexts: Mutex::new(HashMap::new()),
            max_entries,
        }
    }

    /// Get the context for `options.max_len`, building it on a miss.
    ///
    /// Tables are built without holding the lock, so lookups of other sizes
    /// never wait on a build. When two callers race on the same size, the
    /// first insert wins and both receive it.
    pub fn get_or_build(&self, options: &FftOptions) -> Arc<FftContext> {
        let options = options.clone().normalize();
        if let Some(ctx) = self.get(options.max_len) {
            return ctx;
        }

        let built = Arc::new(FftContext::new(&options));

        let mut contexts = self.contexts.lock();
        if let Some(ctx) = contexts.get(&options.max_len) {
            debug!(max_len = options.max_len, "context built concurrently, discarding ours");
            return Arc::clone(ctx);
        }
        if contexts.len() >= self.max_entries {
            // Simple eviction: clear all
            debug!(entries = contexts.len(), "context cache full, clearing");
            contexts.clear();
        }
        contexts.insert(options.max_len, Arc::clone(&built));
        built
    }

    /// Get a cached context, if available.
    pub fn get(&self, max_len: usize) -> Option<Arc<FftContext>> {
        self.contexts.lock().get(&max_len).cloned()
    }

    /// Get the number of cached contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.lock().len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.lock().is_empty()
    }

    /// Clear the cache.
    pub fn clear(&self) {
        self.contexts.lock().clear();
    }
}

impl Default for ContextCache {
    fn default() -> Self {
        Self::new(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(max_len: usize) -> FftOptions {
        FftOptions {
            max_len,
            ..FftOptions::default()
        }
    }

    #[test]
    fn cache_builds_once() {
        let cache = ContextCache::new(4);
        let a = cache.get_or_build(&opts(64));
        let b = cache.get_or_build(&opts(64));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_keys_on_normalized_length() {
        let cache = ContextCache::new(4);
        let a = cache.get_or_build(&opts(60));
        assert_eq!(a.max_len(), 64);
        assert!(cache.get(64).is_some());
        assert!(cache.get(60).is_none());
    }

    #[test]
    fn cache_eviction_clears_all_then_inserts() {
        let cache = ContextCache::new(2);
        cache.get_or_build(&opts(16));
        cache.get_or_build(&opts(32));
        assert_eq!(cache.len(), 2);

        cache.get_or_build(&opts(64));
        assert!(cache.get(16).is_none());
        assert!(cache.get(32).is_none());
        assert!(cache.get(64).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_default_and_clear() {
        let cache = ContextCache::default();
        assert!(cache.is_empty());
        cache.get_or_build(&opts(8));
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_concurrent_access() {
        use std::thread;

        let cache = Arc::new(ContextCache::new(16));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..4 {
                        let ctx = cache.get_or_build(&opts(8 << ((t + i) % 4)));
                        assert!(ctx.max_len() >= 8);
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn racing_builds_share_one_context() {
        use std::sync::Barrier;
        use std::thread;

        let cache = Arc::new(ContextCache::new(4));
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.get_or_build(&opts(1 << 12))
                })
            })
            .collect();

        let contexts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let cached = cache.get(1 << 12).unwrap();
        for ctx in &contexts {
            assert!(Arc::ptr_eq(ctx, &cached));
        }
        assert_eq!(cache.len(), 1);
    }
}
