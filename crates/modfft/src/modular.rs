//! Exact modular products through a double-precision transform.
//!
//! Every residue is taken in centered form and split as `lo + hi * 2^15`.
//! Both limbs of an operand are packed into one complex sequence of half the
//! product length: coefficient `i` lands in slot `i mod n` scaled by
//! `root(2n, i)`, so coefficients `i` and `i + n` share a slot as its real
//! and imaginary channel. The twisted cyclic product of length `n` is then
//! the product modulo `x^(2n) + 1`.

use std::marker::PhantomData;

use tracing::trace;

use crate::constants::{LANES, SPLIT};
use crate::context::FftContext;
use crate::cvector::ComplexVector;
use crate::modint::ModularCoefficient;
use crate::transform::Transform;

/// How far reconstructed doubles strayed from the integers they round to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoundingReport {
    /// Largest distance between a reconstructed double and its nearest integer.
    pub max_error: f64,
    /// Number of doubles rounded.
    pub samples: usize,
}

impl RoundingReport {
    #[allow(clippy::cast_possible_truncation)]
    fn round(&mut self, value: f64) -> i64 {
        let nearest = value.round();
        self.max_error = self.max_error.max((value - nearest).abs());
        self.samples += 1;
        nearest as i64
    }
}

/// Forward transform of a modular operand: low limbs in one vector, high
/// limbs in the other.
pub struct ModularTransform<'ctx, T> {
    lo: ComplexVector<'ctx>,
    hi: ComplexVector<'ctx>,
    len: usize,
    _coeff: PhantomData<T>,
}

impl<'ctx, T: ModularCoefficient> ModularTransform<'ctx, T> {
    /// Complex transform size, or 0 for an empty transform. Products have
    /// twice this many coefficients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this transform was built with `n == 0`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Multiply and report the rounding error of the reconstruction.
    #[must_use]
    pub fn multiply_inspected(self, other: Self) -> (Vec<T>, RoundingReport) {
        assert_eq!(self.len, other.len, "transform sizes differ");
        self.combine(other.lo, other.hi)
    }

    /// Square and report the rounding error of the reconstruction.
    #[must_use]
    pub fn square_inspected(self) -> (Vec<T>, RoundingReport) {
        let (lo, hi) = (self.lo.clone(), self.hi.clone());
        self.combine(lo, hi)
    }

    fn combine(mut self, mut c: ComplexVector<'ctx>, d: ComplexVector<'ctx>) -> (Vec<T>, RoundingReport) {
        let mut report = RoundingReport::default();
        let n = self.len;
        if n == 0 {
            return (Vec::new(), report);
        }
        for k in (0..n).step_by(LANES) {
            let (a, b) = (self.lo.get_lane(k), self.hi.get_lane(k));
            let (x, y) = (c.get_lane(k), d.get_lane(k));
            c.set_lane(k, a * y + b * x);
            self.lo.set_lane(k, a * x);
            self.hi.set_lane(k, b * y);
        }
        self.lo.ifft();
        self.hi.ifft();
        c.ifft();

        let split = T::from_i64(SPLIT);
        let split_sq = split * split;
        let mut res = vec![T::zero(); 2 * n];
        let (lo, hi) = (&self.lo, &self.hi);
        lo.context().for_each_root(2 * n, n, |i, rt| {
            let rt = rt.conj();
            let low = lo.get(i) * rt;
            let mid = c.get(i) * rt;
            let high = hi.get(i) * rt;
            res[i] = T::from_i64(report.round(low.re))
                + T::from_i64(report.round(mid.re)) * split
                + T::from_i64(report.round(high.re)) * split_sq;
            res[n + i] = T::from_i64(report.round(low.im))
                + T::from_i64(report.round(mid.im)) * split
                + T::from_i64(report.round(high.im)) * split_sq;
        });
        trace!(size = n, max_error = report.max_error, "reconstructed modular product");
        (res, report)
    }
}

impl<'ctx, T: ModularCoefficient> Transform<'ctx, T> for ModularTransform<'ctx, T> {
    #[allow(clippy::cast_precision_loss)]
    fn new(ctx: &'ctx FftContext, coeffs: &[T], n: usize) -> Self {
        let mut lo = ComplexVector::new(ctx, n);
        let mut hi = ComplexVector::new(ctx, n);
        if n == 0 {
            return Self {
                lo,
                hi,
                len: 0,
                _coeff: PhantomData,
            };
        }
        let size = lo.len();
        ctx.for_each_root(2 * size, coeffs.len(), |i, rt| {
            let v = coeffs[i].centered();
            lo.accumulate(i % size, rt * (v % SPLIT) as f64);
            hi.accumulate(i % size, rt * (v / SPLIT) as f64);
        });
        lo.fft();
        hi.fft();
        trace!(coefficients = coeffs.len(), size, "packed modular operand");
        Self {
            lo,
            hi,
            len: size,
            _coeff: PhantomData,
        }
    }

    fn multiply(self, other: Self) -> Vec<T> {
        self.multiply_inspected(other).0
    }

    fn square(self) -> Vec<T> {
        self.square_inspected().0
    }
}
