//! Public polynomial multiplication API.
//!
//! Routes short operands to direct convolution and everything else to the
//! transform selected by the coefficient type.

use tracing::debug;

use crate::constants::MIN_CIRCULAR_LEN;
use crate::context::{default_context, FftContext};
use crate::error::FftError;
use crate::naive::naive_mul;
use crate::options::FftOptions;
use crate::transform::{Coefficient, Transform};

/// Replace `a` with the linear product `a * b`.
pub fn mul<T: Coefficient>(a: &mut Vec<T>, b: &[T]) {
    mul_with(default_context(), &FftOptions::default(), a, b);
}

/// Replace `a` with `a * a`, transforming it only once.
pub fn sqr<T: Coefficient>(a: &mut Vec<T>) {
    sqr_with(default_context(), &FftOptions::default(), a);
}

/// Replace `a` with `a * b mod (x^N - 1)`; see [`wrap_len`].
pub fn circular_mul<T: Coefficient>(a: &mut Vec<T>, b: &[T]) {
    circular_mul_with(default_context(), &FftOptions::default(), a, b);
}

/// Replace `a` with `a * b mod (x^N + 1)`; see [`wrap_len`].
pub fn negacyclic_mul<T: Coefficient>(a: &mut Vec<T>, b: &[T]) {
    negacyclic_mul_with(default_context(), &FftOptions::default(), a, b);
}

/// [`mul`] that refuses inputs whose transform product would lose precision.
pub fn try_mul<T: Coefficient>(a: &mut Vec<T>, b: &[T]) -> Result<(), FftError> {
    try_mul_with(default_context(), &FftOptions::default(), a, b)
}

/// Wraparound length used by [`circular_mul`] and [`negacyclic_mul`]:
/// the longer operand rounded up to a power of two, at least 8.
#[must_use]
pub fn wrap_len(a_len: usize, b_len: usize) -> usize {
    a_len.max(b_len).max(MIN_CIRCULAR_LEN).next_power_of_two()
}

/// [`mul`] against an explicit context and options.
///
/// Precision limits are only checked by `debug_assert!`; use
/// [`try_mul_with`] when the inputs are not known to be in range.
pub fn mul_with<T: Coefficient>(ctx: &FftContext, options: &FftOptions, a: &mut Vec<T>, b: &[T]) {
    if uses_naive(options, a.len(), b.len()) {
        debug!(a_len = a.len(), b_len = b.len(), "direct convolution");
        naive_mul(a, b);
        return;
    }
    let combined = a.len() + b.len() - 1;
    debug_assert!(
        T::check_precision(combined).is_ok(),
        "product of {combined} coefficients exceeds transform precision"
    );
    let n = T::transform_len(combined);
    debug!(a_len = a.len(), b_len = b.len(), size = n, "transform multiplication");
    let product = forward(ctx, a, n).multiply(forward(ctx, b, n));
    *a = product;
    a.truncate(combined);
}

/// [`sqr`] against an explicit context and options.
pub fn sqr_with<T: Coefficient>(ctx: &FftContext, options: &FftOptions, a: &mut Vec<T>) {
    if uses_naive(options, a.len(), a.len()) {
        debug!(len = a.len(), "direct squaring");
        let copy = a.clone();
        naive_mul(a, &copy);
        return;
    }
    let combined = 2 * a.len() - 1;
    debug_assert!(
        T::check_precision(combined).is_ok(),
        "product of {combined} coefficients exceeds transform precision"
    );
    let n = T::transform_len(combined);
    debug!(len = a.len(), size = n, "transform squaring");
    let product = forward(ctx, a, n).square();
    *a = product;
    a.truncate(combined);
}

/// [`circular_mul`] against an explicit context and options.
pub fn circular_mul_with<T: Coefficient>(ctx: &FftContext, options: &FftOptions, a: &mut Vec<T>, b: &[T]) {
    let len = wrap_len(a.len(), b.len());
    match T::cyclic_transform_len(len) {
        Some(n) if !uses_naive(options, a.len(), b.len()) => {
            debug!(a_len = a.len(), b_len = b.len(), size = n, "native cyclic multiplication");
            *a = forward(ctx, a, n).multiply(forward(ctx, b, n));
        }
        _ => {
            mul_with(ctx, options, a, b);
            fold(a, len, false);
        }
    }
}

/// [`negacyclic_mul`] against an explicit context and options.
pub fn negacyclic_mul_with<T: Coefficient>(ctx: &FftContext, options: &FftOptions, a: &mut Vec<T>, b: &[T]) {
    let len = wrap_len(a.len(), b.len());
    match T::negacyclic_transform_len(len) {
        Some(n) if !uses_naive(options, a.len(), b.len()) => {
            debug_assert!(
                T::check_precision(len).is_ok(),
                "wraparound length {len} exceeds transform precision"
            );
            debug!(a_len = a.len(), b_len = b.len(), size = n, "native negacyclic multiplication");
            *a = forward(ctx, a, n).multiply(forward(ctx, b, n));
        }
        _ => {
            mul_with(ctx, options, a, b);
            fold(a, len, true);
        }
    }
}

/// [`try_mul`] against an explicit context and options.
///
/// Direct convolution is exact, so only products routed through the
/// transform are checked.
pub fn try_mul_with<T: Coefficient>(
    ctx: &FftContext,
    options: &FftOptions,
    a: &mut Vec<T>,
    b: &[T],
) -> Result<(), FftError> {
    if !uses_naive(options, a.len(), b.len()) {
        T::check_precision(a.len() + b.len() - 1)?;
    }
    mul_with(ctx, options, a, b);
    Ok(())
}

fn forward<'ctx, T: Coefficient>(ctx: &'ctx FftContext, coeffs: &[T], n: usize) -> T::Transform<'ctx> {
    <T::Transform<'ctx> as Transform<'ctx, T>>::new(ctx, coeffs, n)
}

/// Empty operands always take the direct path.
fn uses_naive(options: &FftOptions, a_len: usize, b_len: usize) -> bool {
    a_len.min(b_len) < options.clone().normalize().naive_threshold
}

/// Sum `a` into `len` slots by index modulo `len`, negating terms from odd
/// wraps when `negate` is set.
fn fold<T: Coefficient>(a: &mut Vec<T>, len: usize, negate: bool) {
    let mut out = vec![T::zero(); len];
    for (i, &c) in a.iter().enumerate() {
        if negate && (i / len) % 2 == 1 {
            out[i % len] = out[i % len] - c;
        } else {
            out[i % len] += c;
        }
    }
    *a = out;
}
