//! Complex sample vector with in-place forward and inverse transforms.
//!
//! The forward transform is a decimation-in-frequency Cooley-Tukey network
//! that leaves its output in bit-reversed order; the inverse is the matching
//! decimation-in-time network that consumes bit-reversed input. Pointwise
//! products in between do not care about the order, so no permutation pass is
//! ever run.

use num_complex::Complex64;

use modfft_memory::AlignedBuffer;

use crate::constants::{LANES, MIN_TRANSFORM_LEN};
use crate::context::FftContext;
use crate::lane::{CLane, F64x4, Sample};
use crate::tables::RootTable;

/// A power-of-two sized sequence of complex doubles, real and imaginary
/// channels stored in separate lane arrays.
pub struct ComplexVector<'ctx> {
    ctx: &'ctx FftContext,
    re: AlignedBuffer<F64x4>,
    im: AlignedBuffer<F64x4>,
}

impl<'ctx> ComplexVector<'ctx> {
    /// Zeroed vector of at least `n` samples.
    #[must_use]
    pub fn new(ctx: &'ctx FftContext, n: usize) -> Self {
        let mut vector = Self {
            ctx,
            re: AlignedBuffer::default(),
            im: AlignedBuffer::default(),
        };
        vector.resize(n);
        vector
    }

    /// Resize to `n` rounded up to a power of two >= 4.
    ///
    /// Storage is only replaced when the rounded size differs; the common
    /// prefix survives, new samples are zero.
    pub fn resize(&mut self, n: usize) {
        let n = n.max(MIN_TRANSFORM_LEN).next_power_of_two();
        if self.len() == n {
            return;
        }
        let allocator = self.ctx.allocator();
        let mut re: AlignedBuffer<F64x4> = allocator.allocate(n / LANES);
        let mut im: AlignedBuffer<F64x4> = allocator.allocate(n / LANES);
        let keep = re.len().min(self.re.len());
        re[..keep].copy_from_slice(&self.re[..keep]);
        im[..keep].copy_from_slice(&self.im[..keep]);
        allocator.deallocate(std::mem::replace(&mut self.re, re));
        allocator.deallocate(std::mem::replace(&mut self.im, im));
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.re.len() * LANES
    }

    /// Always false once constructed; the minimum size is one lane.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    /// Context this vector was built against.
    #[must_use]
    pub fn context(&self) -> &'ctx FftContext {
        self.ctx
    }

    /// Sample `k`.
    #[must_use]
    pub fn get(&self, k: usize) -> Complex64 {
        Complex64::load(&self.re, &self.im, k)
    }

    /// Overwrite sample `k`.
    pub fn set(&mut self, k: usize, value: Complex64) {
        value.store(&mut self.re, &mut self.im, k);
    }

    /// Add `value` to sample `k`.
    pub fn accumulate(&mut self, k: usize, value: Complex64) {
        let cur = self.get(k);
        self.set(k, cur + value);
    }

    /// The lane starting at sample `k` (a multiple of 4).
    #[must_use]
    pub fn get_lane(&self, k: usize) -> CLane {
        CLane::load(&self.re, &self.im, k)
    }

    /// Overwrite the lane starting at sample `k` (a multiple of 4).
    pub fn set_lane(&mut self, k: usize, lane: CLane) {
        lane.store(&mut self.re, &mut self.im, k);
    }

    /// Pointwise multiply by `other`, which must have the same size.
    pub fn dot(&mut self, other: &Self) {
        assert_eq!(self.len(), other.len(), "pointwise product of unequal sizes");
        let (re, im) = (&mut *self.re, &mut *self.im);
        for ((xr, xi), (yr, yi)) in re.iter_mut().zip(im.iter_mut()).zip(other.re.iter().zip(other.im.iter())) {
            let product = CLane { re: *xr, im: *xi } * CLane { re: *yr, im: *yi };
            *xr = product.re;
            *xi = product.im;
        }
    }

    /// Pointwise square.
    pub fn square(&mut self) {
        let (re, im) = (&mut *self.re, &mut *self.im);
        for (xr, xi) in re.iter_mut().zip(im.iter_mut()) {
            let x = CLane { re: *xr, im: *xi };
            let product = x * x;
            *xr = product.re;
            *xi = product.im;
        }
    }

    /// In-place forward transform; output in bit-reversed order.
    ///
    /// Sample `rev(k)` ends up holding `Σ x_j · exp(2πi·jk/N)`.
    pub fn fft(&mut self) {
        let n = self.len();
        let roots = self.ctx.roots();
        let (re, im) = (&mut *self.re, &mut *self.im);
        let mut span = n / 2;
        while span >= 1 {
            for start in (0..n).step_by(2 * span) {
                if 2 * span <= LANES {
                    dif_block::<Complex64>(roots, re, im, start, span);
                } else {
                    dif_block::<CLane>(roots, re, im, start, span);
                }
            }
            span /= 2;
        }
    }

    /// In-place normalized inverse of [`fft`](Self::fft); input in
    /// bit-reversed order, output in natural order.
    pub fn ifft(&mut self) {
        let n = self.len();
        let roots = self.ctx.roots();
        let (re, im) = (&mut *self.re, &mut *self.im);
        let mut span = 1;
        while span < n {
            for start in (0..n).step_by(2 * span) {
                if 2 * span <= LANES {
                    dit_block::<Complex64>(roots, re, im, start, span);
                } else {
                    dit_block::<CLane>(roots, re, im, start, span);
                }
            }
            span *= 2;
        }
        #[allow(clippy::cast_precision_loss)]
        let scale = n as f64;
        for (xr, xi) in re.iter_mut().zip(im.iter_mut()) {
            let lane = CLane { re: *xr, im: *xi }.scale_down(scale);
            *xr = lane.re;
            *xi = lane.im;
        }
    }

    /// The `k`-th frequency in natural order, after [`fft`](Self::fft).
    #[must_use]
    pub fn spectrum(&self, k: usize) -> Complex64 {
        self.get(self.ctx.bitreverse(self.len(), k))
    }
}

impl Clone for ComplexVector<'_> {
    fn clone(&self) -> Self {
        let allocator = self.ctx.allocator();
        let mut re: AlignedBuffer<F64x4> = allocator.allocate(self.re.len());
        let mut im: AlignedBuffer<F64x4> = allocator.allocate(self.im.len());
        re.copy_from_slice(&self.re);
        im.copy_from_slice(&self.im);
        Self {
            ctx: self.ctx,
            re,
            im,
        }
    }
}

impl Drop for ComplexVector<'_> {
    fn drop(&mut self) {
        let allocator = self.ctx.allocator();
        allocator.deallocate(std::mem::take(&mut self.re));
        allocator.deallocate(std::mem::take(&mut self.im));
    }
}

impl std::fmt::Debug for ComplexVector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplexVector")
            .field("len", &self.len())
            .field("mapped", &self.re.is_mapped())
            .finish()
    }
}

/// Twiddles `root(span, offset..offset + P::WIDTH)`.
#[inline]
fn twiddle<P: Sample>(roots: &RootTable, span: usize, offset: usize) -> P {
    if span <= roots.max_span() {
        P::load(roots.re(), roots.im(), span + offset)
    } else {
        P::gather(|l| roots.root(span, offset + l))
    }
}

/// Decimation-in-frequency butterflies over `start..start + 2 * span`.
#[inline]
fn dif_block<P: Sample>(roots: &RootTable, re: &mut [F64x4], im: &mut [F64x4], start: usize, span: usize) {
    for k in (start..start + span).step_by(P::WIDTH) {
        let x = P::load(re, im, k);
        let y = P::load(re, im, k + span);
        let w: P = twiddle(roots, span, k - start);
        (x + y).store(re, im, k);
        ((x - y) * w).store(re, im, k + span);
    }
}

/// Decimation-in-time butterflies over `start..start + 2 * span`.
#[inline]
fn dit_block<P: Sample>(roots: &RootTable, re: &mut [F64x4], im: &mut [F64x4], start: usize, span: usize) {
    for k in (start..start + span).step_by(P::WIDTH) {
        let w: P = twiddle(roots, span, k - start);
        let t = P::load(re, im, k + span) * w.conj();
        let x = P::load(re, im, k);
        (x - t).store(re, im, k + span);
        (x + t).store(re, im, k);
    }
}
