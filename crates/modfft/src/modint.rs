//! Residues modulo a compile-time modulus.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{One, Zero};

/// Capabilities the modular transform needs from a coefficient type.
pub trait ModularCoefficient:
    Copy + Zero + One + Add<Output = Self> + Mul<Output = Self> + 'static
{
    /// The modulus `p`.
    fn modulus() -> u64;

    /// Canonical representative in `[0, p)`.
    fn value(self) -> u64;

    /// Centered representative in `(-p/2, p/2]`.
    fn centered(self) -> i64;

    /// Reduce an arbitrary signed integer.
    fn from_i64(value: i64) -> Self;
}

/// An element of `Z/MZ`, stored canonically.
///
/// `M` must lie in `[1, i64::MAX]` so sums of residues fit a `u64` and
/// centered values fit an `i64`. Other moduli are rejected at compile time:
///
/// ```compile_fail
/// let _ = modfft::ModInt::<{ u64::MAX }>::new(1);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModInt<const M: u64> {
    r: u64,
}

/// Residues modulo the NTT-friendly prime 998244353.
pub type Mod998244353 = ModInt<998_244_353>;

/// Residues modulo the prime 10^9 + 7.
pub type Mod1000000007 = ModInt<1_000_000_007>;

impl<const M: u64> ModInt<M> {
    #[allow(clippy::cast_sign_loss)]
    const VALID_MODULUS: () = assert!(M >= 1 && M <= i64::MAX as u64, "modulus must lie in [1, i64::MAX]");

    /// Reduce `value` modulo `M`.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        let () = Self::VALID_MODULUS;
        Self { r: value % M }
    }

    /// Canonical value in `[0, M)`.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.r
    }

    /// `self^exp` by square-and-multiply.
    #[must_use]
    pub fn pow(self, mut exp: u64) -> Self {
        let mut base = self;
        let mut acc = Self::one();
        while exp > 0 {
            if exp & 1 == 1 {
                acc *= base;
            }
            base *= base;
            exp >>= 1;
        }
        acc
    }

    /// Multiplicative inverse; `M` must be prime and `self` non-zero.
    #[must_use]
    pub fn inv(self) -> Self {
        debug_assert!(self.r != 0, "inverse of zero");
        self.pow(M - 2)
    }
}

impl<const M: u64> ModularCoefficient for ModInt<M> {
    fn modulus() -> u64 {
        M
    }

    fn value(self) -> u64 {
        self.r
    }

    #[allow(clippy::cast_possible_wrap)]
    fn centered(self) -> i64 {
        if 2 * self.r > M {
            self.r as i64 - M as i64
        } else {
            self.r as i64
        }
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn from_i64(value: i64) -> Self {
        let () = Self::VALID_MODULUS;
        Self {
            r: i128::from(value).rem_euclid(i128::from(M)) as u64,
        }
    }
}

impl<const M: u64> From<u64> for ModInt<M> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<const M: u64> From<i64> for ModInt<M> {
    fn from(value: i64) -> Self {
        <Self as ModularCoefficient>::from_i64(value)
    }
}

impl<const M: u64> Default for ModInt<M> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const M: u64> Zero for ModInt<M> {
    fn zero() -> Self {
        let () = Self::VALID_MODULUS;
        Self { r: 0 }
    }

    fn is_zero(&self) -> bool {
        self.r == 0
    }
}

impl<const M: u64> One for ModInt<M> {
    fn one() -> Self {
        Self::new(1)
    }
}

impl<const M: u64> Add for ModInt<M> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let () = Self::VALID_MODULUS;
        let sum = self.r + rhs.r;
        Self {
            r: if sum >= M { sum - M } else { sum },
        }
    }
}

impl<const M: u64> Sub for ModInt<M> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            r: if self.r >= rhs.r {
                self.r - rhs.r
            } else {
                self.r + M - rhs.r
            },
        }
    }
}

impl<const M: u64> Mul for ModInt<M> {
    type Output = Self;

    #[allow(clippy::cast_possible_truncation)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            r: (u128::from(self.r) * u128::from(rhs.r) % u128::from(M)) as u64,
        }
    }
}

impl<const M: u64> Neg for ModInt<M> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            r: if self.r == 0 { 0 } else { M - self.r },
        }
    }
}

impl<const M: u64> AddAssign for ModInt<M> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const M: u64> SubAssign for ModInt<M> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<const M: u64> MulAssign for ModInt<M> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<const M: u64> fmt::Display for ModInt<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.r)
    }
}

impl<const M: u64> fmt::Debug for ModInt<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.r)
    }
}
