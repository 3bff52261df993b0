//! Fixed-width lanes of doubles and the sample abstraction over them.
//!
//! Butterflies are written once against [`Sample`] and run either on single
//! complex points ([`Complex64`]) or on four points at a time ([`CLane`]).
//! Lane arithmetic is plain element-wise array code that the compiler lowers
//! to vector instructions.

use std::ops::{Add, Div, Mul, Neg, Sub};

use bytemuck::{Pod, Zeroable};
use num_complex::Complex64;

use crate::constants::LANES;

/// Four doubles aligned to a 32-byte boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C, align(32))]
pub struct F64x4(pub [f64; LANES]);

impl F64x4 {
    /// All lanes set to `value`.
    #[inline]
    #[must_use]
    pub fn splat(value: f64) -> Self {
        Self([value; LANES])
    }

    #[inline]
    fn zip(self, rhs: Self, op: impl Fn(f64, f64) -> f64) -> Self {
        Self(std::array::from_fn(|i| op(self.0[i], rhs.0[i])))
    }
}

impl Add for F64x4 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl Sub for F64x4 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

impl Mul for F64x4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a * b)
    }
}

impl Div for F64x4 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a / b)
    }
}

impl Neg for F64x4 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(self.0.map(|v| -v))
    }
}

/// Four complex points stored as separate real and imaginary lanes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CLane {
    /// Real parts.
    pub re: F64x4,
    /// Imaginary parts.
    pub im: F64x4,
}

impl CLane {
    /// Build a lane from four complex points.
    #[must_use]
    pub fn from_points(points: [Complex64; LANES]) -> Self {
        Self {
            re: F64x4(points.map(|p| p.re)),
            im: F64x4(points.map(|p| p.im)),
        }
    }

    /// The `i`-th point of the lane.
    #[inline]
    #[must_use]
    pub fn point(&self, i: usize) -> Complex64 {
        Complex64::new(self.re.0[i], self.im.0[i])
    }

    /// Divide every point by a real scalar.
    #[inline]
    #[must_use]
    pub fn scale_down(self, divisor: f64) -> Self {
        let d = F64x4::splat(divisor);
        Self {
            re: self.re / d,
            im: self.im / d,
        }
    }
}

impl Add for CLane {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Sub for CLane {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl Mul for CLane {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

/// A unit of butterfly work: one complex point or one lane of them.
pub trait Sample: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> {
    /// Number of consecutive logical points covered.
    const WIDTH: usize;

    /// Complex conjugate.
    #[must_use]
    fn conj(self) -> Self;

    /// Read the sample starting at logical index `k`.
    fn load(re: &[F64x4], im: &[F64x4], k: usize) -> Self;

    /// Write the sample starting at logical index `k`.
    fn store(self, re: &mut [F64x4], im: &mut [F64x4], k: usize);

    /// Build a sample point by point from `point(0..WIDTH)`.
    fn gather(point: impl Fn(usize) -> Complex64) -> Self;
}

impl Sample for Complex64 {
    const WIDTH: usize = 1;

    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(&self)
    }

    #[inline]
    fn load(re: &[F64x4], im: &[F64x4], k: usize) -> Self {
        Complex64::new(re[k / LANES].0[k % LANES], im[k / LANES].0[k % LANES])
    }

    #[inline]
    fn store(self, re: &mut [F64x4], im: &mut [F64x4], k: usize) {
        re[k / LANES].0[k % LANES] = self.re;
        im[k / LANES].0[k % LANES] = self.im;
    }

    #[inline]
    fn gather(point: impl Fn(usize) -> Complex64) -> Self {
        point(0)
    }
}

impl Sample for CLane {
    const WIDTH: usize = LANES;

    #[inline]
    fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    #[inline]
    fn load(re: &[F64x4], im: &[F64x4], k: usize) -> Self {
        debug_assert_eq!(k % LANES, 0);
        Self {
            re: re[k / LANES],
            im: im[k / LANES],
        }
    }

    #[inline]
    fn store(self, re: &mut [F64x4], im: &mut [F64x4], k: usize) {
        debug_assert_eq!(k % LANES, 0);
        re[k / LANES] = self.re;
        im[k / LANES] = self.im;
    }

    #[inline]
    fn gather(point: impl Fn(usize) -> Complex64) -> Self {
        Self::from_points(std::array::from_fn(point))
    }
}
