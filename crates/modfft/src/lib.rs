//! # modfft
//!
//! Polynomial multiplication over `Z/pZ` through a double-precision complex
//! FFT. Residues are split into 15-bit limbs and both limbs of an operand
//! share one half-length transform, so products up to 2^18 coefficients
//! under moduli up to 2^30 reconstruct exactly after rounding.
//!
//! ```
//! use modfft::{mul, Mod998244353};
//!
//! let mut a: Vec<Mod998244353> = [1, 2, 3].map(Mod998244353::new).to_vec();
//! let b: Vec<Mod998244353> = [4, 5, 6].map(Mod998244353::new).to_vec();
//! mul(&mut a, &b);
//! assert_eq!(a, [4, 13, 28, 27, 18].map(Mod998244353::new));
//! ```

pub mod constants;
pub mod context;
pub mod context_cache;
pub mod cvector;
pub mod error;
pub mod fft;
pub mod lane;
pub mod memory_est;
pub mod modint;
pub mod modular;
pub mod naive;
pub mod options;
pub mod tables;
pub mod transform;

// Re-exports
pub use context::{default_context, FftContext};
pub use context_cache::ContextCache;
pub use cvector::ComplexVector;
pub use error::FftError;
pub use fft::{
    circular_mul, circular_mul_with, mul, mul_with, negacyclic_mul, negacyclic_mul_with, sqr, sqr_with, try_mul,
    try_mul_with, wrap_len,
};
pub use memory_est::{estimate_mul_memory, estimate_mul_memory_with, MemoryEstimate};
pub use modint::{Mod1000000007, Mod998244353, ModInt, ModularCoefficient};
pub use modular::{ModularTransform, RoundingReport};
pub use naive::naive_mul;
pub use options::FftOptions;
pub use transform::{packed_transform_len, Coefficient, GenericTransform, Transform};
