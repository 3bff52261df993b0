//! Transform strategies and the coefficient types that select them.
//!
//! Each coefficient type names its transform through
//! [`Coefficient::Transform`], so the dispatcher picks the plain floating
//! strategy or the limb-splitting modular one at compile time.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Sub};

use num_complex::Complex64;
use num_traits::{One, Zero};

use crate::constants::{MAX_PRECISE_LEN, MAX_PRECISE_MODULUS, MIN_TRANSFORM_LEN};
use crate::context::FftContext;
use crate::cvector::ComplexVector;
use crate::error::FftError;
use crate::modint::{ModInt, ModularCoefficient};
use crate::modular::ModularTransform;

/// A forward-transformed operand.
pub trait Transform<'ctx, T>: Sized {
    /// Transform `coeffs` at size `n` (rounded up to a power of two).
    fn new(ctx: &'ctx FftContext, coeffs: &[T], n: usize) -> Self;

    /// Multiply two transforms of the same size and return the coefficients.
    fn multiply(self, other: Self) -> Vec<T>;

    /// Multiply the transform by itself without a second forward pass.
    fn square(self) -> Vec<T>;
}

/// Coefficient types the dispatcher can multiply.
pub trait Coefficient:
    Copy
    + PartialEq
    + Debug
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + 'static
{
    /// Transform strategy for this coefficient type.
    type Transform<'ctx>: Transform<'ctx, Self>;

    /// Transform size for a linear product of `combined` coefficients.
    fn transform_len(combined: usize) -> usize;

    /// Transform size that realizes `c mod (x^len - 1)` natively, if any.
    fn cyclic_transform_len(_len: usize) -> Option<usize> {
        None
    }

    /// Transform size that realizes `c mod (x^len + 1)` natively, if any.
    fn negacyclic_transform_len(_len: usize) -> Option<usize> {
        None
    }

    /// Whether a product of `combined` coefficients reconstructs exactly.
    fn check_precision(_combined: usize) -> Result<(), FftError> {
        Ok(())
    }
}

/// Transform of plain floating coefficients.
///
/// Realizes circular convolution of length `n`; the caller picks `n` no
/// smaller than the combined length to avoid wraparound.
pub struct GenericTransform<'ctx> {
    values: ComplexVector<'ctx>,
    len: usize,
}

impl<'ctx> GenericTransform<'ctx> {
    /// Transformed sample `k` (bit-reversed order).
    #[must_use]
    pub fn sample(&self, k: usize) -> Complex64 {
        self.values.get(k)
    }

    /// Transform size, or 0 for an empty transform.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this transform was built with `n == 0`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn into_coefficients(mut self) -> Vec<f64> {
        self.values.ifft();
        (0..self.len).map(|k| self.values.get(k).re).collect()
    }
}

impl<'ctx> Transform<'ctx, f64> for GenericTransform<'ctx> {
    fn new(ctx: &'ctx FftContext, coeffs: &[f64], n: usize) -> Self {
        let mut values = ComplexVector::new(ctx, n);
        let size = values.len();
        for (i, &c) in coeffs.iter().enumerate() {
            values.accumulate(i % size, Complex64::new(c, 0.0));
        }
        let len = if n == 0 { 0 } else { size };
        if len > 0 {
            values.fft();
        }
        Self { values, len }
    }

    fn multiply(mut self, other: Self) -> Vec<f64> {
        assert_eq!(self.values.len(), other.values.len(), "transform sizes differ");
        if self.len == 0 {
            return Vec::new();
        }
        self.values.dot(&other.values);
        self.into_coefficients()
    }

    fn square(mut self) -> Vec<f64> {
        if self.len == 0 {
            return Vec::new();
        }
        self.values.square();
        self.into_coefficients()
    }
}

impl Coefficient for f64 {
    type Transform<'ctx> = GenericTransform<'ctx>;

    fn transform_len(combined: usize) -> usize {
        combined.max(MIN_TRANSFORM_LEN).next_power_of_two()
    }

    fn cyclic_transform_len(len: usize) -> Option<usize> {
        Some(len)
    }
}

/// Complex size of a packed modular product with `combined` coefficients.
///
/// Two coefficients share each complex slot, so this is half the
/// power-of-two product length, never below [`MIN_TRANSFORM_LEN`].
#[must_use]
pub fn packed_transform_len(combined: usize) -> usize {
    (combined.next_power_of_two() / 2).max(MIN_TRANSFORM_LEN)
}

impl<const M: u64> Coefficient for ModInt<M> {
    type Transform<'ctx> = ModularTransform<'ctx, Self>;

    fn transform_len(combined: usize) -> usize {
        packed_transform_len(combined)
    }

    fn negacyclic_transform_len(len: usize) -> Option<usize> {
        debug_assert!(len.is_power_of_two() && len >= 2 * MIN_TRANSFORM_LEN);
        Some(len / 2)
    }

    fn check_precision(combined: usize) -> Result<(), FftError> {
        if Self::modulus() > MAX_PRECISE_MODULUS {
            return Err(FftError::ModulusTooLarge {
                modulus: Self::modulus(),
                limit: MAX_PRECISE_MODULUS,
            });
        }
        if combined > MAX_PRECISE_LEN {
            return Err(FftError::LengthTooLarge {
                len: combined,
                limit: MAX_PRECISE_LEN,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cyclic(a: &[f64], b: &[f64], n: usize) -> Vec<f64> {
        let mut out = vec![0.0; n];
        for (i, &x) in a.iter().enumerate() {
            for (j, &y) in b.iter().enumerate() {
                out[(i + j) % n] += x * y;
            }
        }
        out
    }

    fn assert_close(got: &[f64], expected: &[f64]) {
        assert_eq!(got.len(), expected.len());
        for (i, (g, e)) in got.iter().zip(expected).enumerate() {
            assert!((g - e).abs() < 1e-8, "index {i}: {g} vs {e}");
        }
    }

    #[test]
    fn generic_linear_product() {
        let ctx = FftContext::with_max_len(64);
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let n = f64::transform_len(5);
        assert_eq!(n, 8);
        let got = GenericTransform::new(&ctx, &a, n).multiply(GenericTransform::new(&ctx, &b, n));
        assert_close(&got, &[4.0, 13.0, 28.0, 27.0, 18.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn generic_wraps_when_too_small() {
        let ctx = FftContext::with_max_len(64);
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [0.5, 0.0, 0.0, 1.0];
        let got = GenericTransform::new(&ctx, &a, 4).multiply(GenericTransform::new(&ctx, &b, 4));
        assert_close(&got, &cyclic(&a, &b, 4));
    }

    #[test]
    fn generic_folds_long_input() {
        let ctx = FftContext::with_max_len(64);
        let a: Vec<f64> = (0..10).map(f64::from).collect();
        let b = [1.0];
        let got = GenericTransform::new(&ctx, &a, 8).multiply(GenericTransform::new(&ctx, &b, 8));
        assert_close(&got, &cyclic(&a, &b, 8));
    }

    #[test]
    fn generic_square_matches_multiply() {
        let ctx = FftContext::with_max_len(64);
        let a = [0.25, -1.0, 2.0, 3.5, 0.0, 1.0];
        let n = f64::transform_len(11);
        let squared = GenericTransform::new(&ctx, &a, n).square();
        let product = GenericTransform::new(&ctx, &a, n).multiply(GenericTransform::new(&ctx, &a, n));
        assert_close(&squared, &product);
    }

    #[test]
    fn generic_empty_transform() {
        let ctx = FftContext::with_max_len(64);
        let t = GenericTransform::new(&ctx, &[], 0);
        assert!(t.is_empty());
        assert!(t.multiply(GenericTransform::new(&ctx, &[], 0)).is_empty());
    }

    #[test]
    fn generic_sample_is_spectrum() {
        let ctx = FftContext::with_max_len(64);
        let t = GenericTransform::new(&ctx, &[1.0, 1.0, 1.0, 1.0], 4);
        assert_eq!(t.len(), 4);
        // All the energy sits in frequency 0, stored at index 0.
        assert!((t.sample(0) - Complex64::new(4.0, 0.0)).norm() < 1e-12);
        assert!(t.sample(1).norm() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "transform sizes differ")]
    fn generic_size_mismatch_panics() {
        let ctx = FftContext::with_max_len(64);
        let _ = GenericTransform::new(&ctx, &[1.0], 4).multiply(GenericTransform::new(&ctx, &[1.0], 8));
    }

    #[test]
    fn modular_transform_sizes() {
        type F = crate::modint::Mod998244353;
        assert_eq!(F::transform_len(1), 4);
        assert_eq!(F::transform_len(5), 4);
        assert_eq!(F::transform_len(9), 8);
        assert_eq!(F::transform_len(16), 8);
        assert_eq!(F::transform_len(17), 16);
        assert_eq!(F::negacyclic_transform_len(16), Some(8));
        assert_eq!(f64::negacyclic_transform_len(16), None);
        assert_eq!(f64::cyclic_transform_len(16), Some(16));
        assert_eq!(F::cyclic_transform_len(16), None);
    }

    #[test]
    fn precision_checks() {
        type F = crate::modint::Mod1000000007;
        assert!(F::check_precision(MAX_PRECISE_LEN).is_ok());
        assert_eq!(
            F::check_precision(MAX_PRECISE_LEN + 1),
            Err(FftError::LengthTooLarge {
                len: MAX_PRECISE_LEN + 1,
                limit: MAX_PRECISE_LEN
            })
        );
        type Big = ModInt<2_147_483_647>;
        assert!(matches!(
            Big::check_precision(10),
            Err(FftError::ModulusTooLarge { modulus: 2_147_483_647, .. })
        ));
        assert!(f64::check_precision(usize::MAX).is_ok());
    }
}
