//! Transform context: the tables and allocator every transform reads from.

use std::sync::OnceLock;

use num_complex::Complex64;
use tracing::debug;

use modfft_memory::AlignedAllocator;

use crate::options::FftOptions;
use crate::tables::{BitReversalTable, RootTable};

/// Immutable state shared by all transforms built against it.
///
/// Construction fills the root and bit-reversal tables for polynomials of up
/// to `max_len` coefficients; nothing is written afterwards, so a context can
/// be shared freely between threads.
pub struct FftContext {
    max_len: usize,
    roots: RootTable,
    bitrev: BitReversalTable,
    allocator: AlignedAllocator,
}

impl FftContext {
    /// Build a context from options (normalized first).
    #[must_use]
    pub fn new(options: &FftOptions) -> Self {
        let options = options.clone().normalize();
        let allocator = AlignedAllocator::new(options.allocator_config());
        let roots = RootTable::new(options.max_len, &allocator);
        let bitrev = BitReversalTable::new(options.max_len);
        debug!(
            max_len = options.max_len,
            root_entries = 2 * options.max_len,
            mapped = allocator.stats().mapped_allocations,
            "built transform context"
        );
        Self {
            max_len: options.max_len,
            roots,
            bitrev,
            allocator,
        }
    }

    /// Build a context covering `max_len` coefficients with default options.
    #[must_use]
    pub fn with_max_len(max_len: usize) -> Self {
        Self::new(&FftOptions {
            max_len,
            ..FftOptions::default()
        })
    }

    /// Maximum polynomial length covered by the cached tables.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Root-of-unity table.
    #[must_use]
    pub fn roots(&self) -> &RootTable {
        &self.roots
    }

    /// Bit-reversal table.
    #[must_use]
    pub fn bitrev(&self) -> &BitReversalTable {
        &self.bitrev
    }

    /// Allocator backing transform buffers.
    #[must_use]
    pub fn allocator(&self) -> &AlignedAllocator {
        &self.allocator
    }

    /// `exp(iπk/n)`; see [`RootTable::root`].
    #[must_use]
    pub fn root(&self, n: usize, k: usize) -> Complex64 {
        self.roots.root(n, k)
    }

    /// Walk `root(n, i)` for `i < m`; see [`RootTable::for_each_root`].
    pub fn for_each_root(&self, n: usize, m: usize, f: impl FnMut(usize, Complex64)) {
        self.roots.for_each_root(n, m, f);
    }

    /// `k` with its `log2(n)` low bits reversed.
    #[must_use]
    pub fn bitreverse(&self, n: usize, k: usize) -> usize {
        self.bitrev.reverse(n, k)
    }
}

impl Default for FftContext {
    fn default() -> Self {
        Self::new(&FftOptions::default())
    }
}

/// Process-wide context built from default options on first use.
pub fn default_context() -> &'static FftContext {
    static CONTEXT: OnceLock<FftContext> = OnceLock::new();
    CONTEXT.get_or_init(FftContext::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_normalizes_max_len() {
        let ctx = FftContext::with_max_len(100);
        assert_eq!(ctx.max_len(), 128);
        assert_eq!(ctx.roots().max_span(), 128);
        assert_eq!(ctx.bitrev().max_len(), 128);
    }

    #[test]
    fn bitrev_table_covers_max_len_only() {
        // Full-length transforms of f64 products reach 2 * max_len and
        // compute their indices on demand.
        let ctx = FftContext::with_max_len(1 << 10);
        assert_eq!(ctx.bitrev().max_len(), 1 << 10);
        for k in [0, 1, 5, 1023, 2047] {
            assert_eq!(ctx.bitreverse(2048, k), k.reverse_bits() >> (usize::BITS - 11));
        }
    }

    #[test]
    fn context_delegates_to_tables() {
        let ctx = FftContext::with_max_len(16);
        assert_eq!(ctx.bitreverse(8, 1), 4);
        let rt = ctx.root(2, 1);
        assert!((rt - Complex64::new(0.0, 1.0)).norm() < 1e-15);
        let mut count = 0;
        ctx.for_each_root(4, 3, |_, _| count += 1);
        assert_eq!(count, 3);
    }

    #[test]
    fn small_context_tables_live_on_heap() {
        let ctx = FftContext::with_max_len(64);
        let stats = ctx.allocator().stats();
        assert_eq!(stats.heap_allocations, 2);
        assert_eq!(stats.mapped_allocations, 0);
    }

    #[test]
    fn contexts_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FftContext>();
    }
}
