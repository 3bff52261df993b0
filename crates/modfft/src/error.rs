//! Error types for checked multiplication.

/// Errors reported by the checked entry points.
///
/// Size mismatches between transforms are caller defects and panic instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FftError {
    /// The coefficient modulus does not fit two 15-bit limbs.
    #[error("modulus {modulus} exceeds the exact-reconstruction limit {limit}")]
    ModulusTooLarge {
        /// Modulus of the coefficient type.
        modulus: u64,
        /// Largest supported modulus.
        limit: u64,
    },

    /// The product is too long for rounding to stay exact.
    #[error("combined length {len} exceeds the exact-reconstruction limit {limit}")]
    LengthTooLarge {
        /// `len(a) + len(b) - 1`.
        len: usize,
        /// Largest supported combined length.
        limit: usize,
    },
}
