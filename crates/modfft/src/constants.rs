//! Constants for transform sizing, precision limits and dispatch thresholds.

/// Default maximum polynomial length covered by the cached root table.
///
/// Transforms beyond it still work; their twiddles are evaluated on demand.
pub const DEFAULT_MAX_LEN: usize = 1 << 20;

/// Default operand length below which direct convolution is used.
pub const DEFAULT_NAIVE_THRESHOLD: usize = 250;

/// Default padded buffer size (bytes) from which transform buffers are mapped.
pub const DEFAULT_MMAP_THRESHOLD: usize = modfft_memory::MEGABYTE;

/// Number of `f64` values in one vector lane.
pub const LANES: usize = 4;

/// Smallest transform size; one full lane.
pub const MIN_TRANSFORM_LEN: usize = LANES;

/// Smallest wraparound length used by `circular_mul` and `negacyclic_mul`.
pub const MIN_CIRCULAR_LEN: usize = 2 * LANES;

/// Limb base of the modular split: `v = lo + hi * SPLIT`.
pub const SPLIT: i64 = 1 << 15;

/// Largest modulus for which two 15-bit limbs cover every residue.
pub const MAX_PRECISE_MODULUS: u64 = 1 << 30;

/// Largest combined length (`len(a) + len(b) - 1`) with exact reconstruction.
///
/// Holds for every input, including operands whose limbs all sit at their
/// extremes; random residues stay exact well beyond it.
pub const MAX_PRECISE_LEN: usize = 1 << 18;

/// Walk length after which an incremental root walk is re-anchored.
pub const ROOT_REFRESH_INTERVAL: usize = 16;
