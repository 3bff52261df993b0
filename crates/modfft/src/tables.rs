//! Root-of-unity and bit-reversal tables.
//!
//! Both tables use the same layout: the entries for a power-of-two size `n`
//! occupy indices `n..2n`, so one flat array covers every size up to the
//! table capacity. They are filled once at construction and only read
//! afterwards.

use std::f64::consts::PI;

use num_complex::Complex64;

use modfft_memory::{AlignedAllocator, AlignedBuffer};

use crate::constants::{LANES, ROOT_REFRESH_INTERVAL};
use crate::lane::{Sample, F64x4};

/// Cached powers of the primitive `2n`-th roots of unity.
///
/// Entry `n + k` holds `exp(iπk/n)` for every power of two `n <= max_span`
/// and `k < n`. Stored as lanes so butterflies can load four twiddles at once.
pub struct RootTable {
    max_span: usize,
    re: AlignedBuffer<F64x4>,
    im: AlignedBuffer<F64x4>,
}

impl RootTable {
    /// Build the table for spans up to `max_span` (a power of two >= 4).
    #[must_use]
    pub fn new(max_span: usize, allocator: &AlignedAllocator) -> Self {
        assert!(
            max_span.is_power_of_two() && max_span >= LANES,
            "max_span must be a power of two >= {LANES} but is {max_span}"
        );
        let entries = 2 * max_span;
        let mut re: AlignedBuffer<F64x4> = allocator.allocate(entries / LANES);
        let mut im: AlignedBuffer<F64x4> = allocator.allocate(entries / LANES);

        let mut n = 1;
        while n < entries {
            let step = Complex64::from_polar(1.0, PI / n as f64);
            let mut cur = Complex64::new(1.0, 0.0);
            for k in 0..n {
                // Re-evaluate periodically so the running product cannot drift.
                if k % ROOT_REFRESH_INTERVAL == 0 {
                    cur = Complex64::from_polar(1.0, PI * k as f64 / n as f64);
                }
                cur.store(&mut re, &mut im, n + k);
                cur *= step;
            }
            n *= 2;
        }

        Self { max_span, re, im }
    }

    /// Largest span served from the table.
    #[must_use]
    pub fn max_span(&self) -> usize {
        self.max_span
    }

    /// Real parts as lanes.
    #[must_use]
    pub fn re(&self) -> &[F64x4] {
        &self.re
    }

    /// Imaginary parts as lanes.
    #[must_use]
    pub fn im(&self) -> &[F64x4] {
        &self.im
    }

    /// `exp(iπk/n)`, the k-th power of the primitive `2n`-th root.
    ///
    /// `n` must be a power of two. Sizes beyond the table recurse towards it
    /// for even `k` and fall back to trigonometric evaluation for odd `k`.
    #[must_use]
    pub fn root(&self, n: usize, k: usize) -> Complex64 {
        debug_assert!(n.is_power_of_two());
        let k = k % (2 * n);
        if k >= n {
            return -self.root(n, k - n);
        }
        if n <= self.max_span {
            Complex64::load(&self.re, &self.im, n + k)
        } else if k % 2 == 0 {
            self.root(n / 2, k / 2)
        } else {
            Complex64::from_polar(1.0, PI * k as f64 / n as f64)
        }
    }

    /// Call `f(i, root(n, i))` for every `i < m`.
    ///
    /// Cached sizes are read directly. Larger sizes advance by multiplying
    /// with `root(n, 1)` and re-anchor on an exact value every
    /// [`ROOT_REFRESH_INTERVAL`] steps.
    pub fn for_each_root(&self, n: usize, m: usize, mut f: impl FnMut(usize, Complex64)) {
        let cached = n <= self.max_span;
        let step = self.root(n, 1);
        let mut cur = Complex64::new(1.0, 0.0);
        for i in 0..m {
            f(i, cur);
            cur = if cached || i % ROOT_REFRESH_INTERVAL == 0 {
                self.root(n, i + 1)
            } else {
                cur * step
            };
        }
    }
}

/// Bit-reversal indices for every power-of-two size up to a capacity.
///
/// Entry `n + k` holds `k` with its `log2(n)` low bits reversed.
pub struct BitReversalTable {
    max_len: usize,
    rev: Vec<usize>,
}

impl BitReversalTable {
    /// Build the table for sizes up to `max_len` (a power of two).
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        assert!(max_len.is_power_of_two());
        let mut rev = vec![0; 2 * max_len];
        let mut n = 2;
        while n <= max_len {
            for k in 0..n {
                rev[n + k] = rev[n + k / 2] / 2 + (k & 1) * (n / 2);
            }
            n *= 2;
        }
        Self { max_len, rev }
    }

    /// Largest size served from the table.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// `k` with its `log2(n)` low bits reversed.
    #[must_use]
    pub fn reverse(&self, n: usize, k: usize) -> usize {
        debug_assert!(n.is_power_of_two() && k < n);
        if n <= self.max_len {
            self.rev[n + k]
        } else {
            k.reverse_bits() >> (usize::BITS - n.trailing_zeros())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_root(n: usize, k: usize) -> Complex64 {
        Complex64::from_polar(1.0, PI * k as f64 / n as f64)
    }

    fn close(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn cached_roots_match_polar() {
        let table = RootTable::new(64, &AlignedAllocator::default());
        for n in [1, 2, 4, 8, 16, 32, 64] {
            for k in 0..n {
                assert!(close(table.root(n, k), expected_root(n, k)), "n={n} k={k}");
            }
        }
    }

    #[test]
    fn roots_beyond_table_recurse_or_evaluate() {
        let table = RootTable::new(16, &AlignedAllocator::default());
        for n in [32, 64, 1024] {
            for k in [0, 1, 2, 3, 6, 17, n - 1] {
                assert!(close(table.root(n, k), expected_root(n, k)), "n={n} k={k}");
            }
        }
    }

    #[test]
    fn root_folds_large_exponents() {
        let table = RootTable::new(16, &AlignedAllocator::default());
        // exp(iπ(k + n)/n) = -exp(iπk/n)
        assert!(close(table.root(8, 11), -table.root(8, 3)));
        assert!(close(table.root(8, 16 + 5), table.root(8, 5)));
        assert!(close(table.root(4, 2), Complex64::new(0.0, 1.0)));
    }

    #[test]
    fn root_walk_matches_direct_lookup() {
        let table = RootTable::new(8, &AlignedAllocator::default());
        for n in [8, 64, 4096] {
            let mut visited = 0;
            table.for_each_root(n, n, |i, rt| {
                assert!((rt - expected_root(n, i)).norm() < 1e-11, "n={n} i={i}");
                visited += 1;
            });
            assert_eq!(visited, n);
        }
    }

    #[test]
    fn bit_reversal_small_sizes() {
        let table = BitReversalTable::new(8);
        assert_eq!(table.reverse(1, 0), 0);
        assert_eq!((0..2).map(|k| table.reverse(2, k)).collect::<Vec<_>>(), [0, 1]);
        assert_eq!(
            (0..8).map(|k| table.reverse(8, k)).collect::<Vec<_>>(),
            [0, 4, 2, 6, 1, 5, 3, 7]
        );
    }

    #[test]
    fn bit_reversal_beyond_table() {
        let table = BitReversalTable::new(4);
        for n in [8usize, 32, 256] {
            let bits = n.trailing_zeros();
            for k in 0..n {
                let expected = (0..bits).fold(0, |acc, b| acc | (((k >> b) & 1) << (bits - 1 - b)));
                assert_eq!(table.reverse(n, k), expected, "n={n} k={k}");
            }
        }
    }

    #[test]
    fn table_and_fallback_agree() {
        let table = BitReversalTable::new(1024);
        let small = BitReversalTable::new(4);
        for k in 0..1024 {
            assert_eq!(table.reverse(1024, k), small.reverse(1024, k));
        }
    }
}
