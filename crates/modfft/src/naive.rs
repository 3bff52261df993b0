//! Direct quadratic convolution, exact in the coefficient ring.

use crate::transform::Coefficient;

/// Replace `a` with the linear convolution `a * b` in place.
///
/// Either operand empty leaves `a` empty. Runs in `O(len(a) * len(b))`
/// with no scratch beyond growing `a`.
pub fn naive_mul<T: Coefficient>(a: &mut Vec<T>, b: &[T]) {
    if a.is_empty() || b.is_empty() {
        a.clear();
        return;
    }
    let n = a.len();
    let m = b.len();
    a.resize(n + m - 1, T::zero());
    for k in (0..n + m - 1).rev() {
        // a[k] is still the input coefficient for k < n, zero otherwise.
        a[k] = a[k] * b[0];
        for j in (k + 1).saturating_sub(n).max(1)..m.min(k + 1) {
            let term = a[k - j] * b[j];
            a[k] += term;
        }
    }
}
