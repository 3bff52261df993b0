//! Atomic allocation statistics for lock-free usage tracking.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for allocator usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Number of buffers served from the heap.
    pub heap_allocations: u64,
    /// Number of buffers served from anonymous mappings.
    pub mapped_allocations: u64,
    /// Total bytes handed out through mappings.
    pub mapped_bytes: u64,
    /// Mapping attempts that failed and fell back to the heap.
    pub fallbacks: u64,
    /// Number of buffers returned through `deallocate`.
    pub releases: u64,
}

impl AllocStats {
    /// Total number of buffers handed out, whichever branch served them.
    #[must_use]
    pub fn total_allocations(&self) -> u64 {
        self.heap_allocations + self.mapped_allocations
    }
}

/// Atomic allocation statistics for lock-free updates.
pub struct AtomicAllocStats {
    heap_allocations: AtomicU64,
    mapped_allocations: AtomicU64,
    mapped_bytes: AtomicU64,
    fallbacks: AtomicU64,
    releases: AtomicU64,
}

impl AtomicAllocStats {
    /// Create new zeroed stats.
    pub fn new() -> Self {
        Self {
            heap_allocations: AtomicU64::new(0),
            mapped_allocations: AtomicU64::new(0),
            mapped_bytes: AtomicU64::new(0),
            fallbacks: AtomicU64::new(0),
            releases: AtomicU64::new(0),
        }
    }

    /// Take a snapshot of current stats.
    pub fn snapshot(&self) -> AllocStats {
        AllocStats {
            heap_allocations: self.heap_allocations.load(Ordering::Relaxed),
            mapped_allocations: self.mapped_allocations.load(Ordering::Relaxed),
            mapped_bytes: self.mapped_bytes.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.heap_allocations.store(0, Ordering::Relaxed);
        self.mapped_allocations.store(0, Ordering::Relaxed);
        self.mapped_bytes.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
        self.releases.store(0, Ordering::Relaxed);
    }

    /// Record a heap-backed allocation.
    pub fn record_heap(&self) {
        self.heap_allocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a mapping-backed allocation of `bytes` bytes.
    pub fn record_mapped(&self, bytes: usize) {
        self.mapped_allocations.fetch_add(1, Ordering::Relaxed);
        self.mapped_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record a failed mapping attempt.
    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a returned buffer.
    pub fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for AtomicAllocStats {
    fn default() -> Self {
        Self::new()
    }
}
