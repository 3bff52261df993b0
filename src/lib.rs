//! Shared helpers for the workspace integration tests.

use modfft::{Coefficient, ModInt};

/// Reference linear convolution by the schoolbook formula.
pub fn reference_mul<T: Coefficient>(a: &[T], b: &[T]) -> Vec<T> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![T::zero(); a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Reduce a linear product modulo `x^len - 1`.
pub fn fold_cyclic<T: Coefficient>(c: &[T], len: usize) -> Vec<T> {
    let mut out = vec![T::zero(); len];
    for (i, &x) in c.iter().enumerate() {
        out[i % len] += x;
    }
    out
}

/// Reduce a linear product modulo `x^len + 1`.
pub fn fold_negacyclic<T: Coefficient>(c: &[T], len: usize) -> Vec<T> {
    let mut out = vec![T::zero(); len];
    for (i, &x) in c.iter().enumerate() {
        if (i / len) % 2 == 0 {
            out[i % len] += x;
        } else {
            out[i % len] = out[i % len] - x;
        }
    }
    out
}

/// Residues of `values` modulo `M`.
pub fn residues<const M: u64>(values: &[u64]) -> Vec<ModInt<M>> {
    values.iter().map(|&v| ModInt::new(v)).collect()
}
