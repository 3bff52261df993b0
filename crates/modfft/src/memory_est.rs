//! Memory estimation for modular transform multiplication.

use modfft_memory::AlignedAllocator;

use crate::options::FftOptions;
use crate::transform::packed_transform_len;

/// Complex vectors alive at once during a modular product: two limb
/// vectors per operand.
const LIVE_VECTORS: usize = 4;

/// Buffer footprint of one multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryEstimate {
    /// Complex transform size, 0 when the direct path is taken.
    pub transform_len: usize,
    /// Bytes of one real or imaginary channel.
    pub buffer_bytes: usize,
    /// Bytes of all transform buffers together.
    pub total_bytes: usize,
    /// Whether the buffers come from anonymous mappings.
    pub mapped: bool,
}

/// Estimate the buffers [`mul`](crate::mul) allocates for modular operands
/// of the given lengths under default options.
#[must_use]
pub fn estimate_mul_memory(a_len: usize, b_len: usize) -> MemoryEstimate {
    estimate_mul_memory_with(&FftOptions::default(), a_len, b_len)
}

/// [`estimate_mul_memory`] under explicit options.
#[must_use]
pub fn estimate_mul_memory_with(options: &FftOptions, a_len: usize, b_len: usize) -> MemoryEstimate {
    let options = options.clone().normalize();
    if a_len.min(b_len) < options.naive_threshold {
        return MemoryEstimate::default();
    }
    let combined = a_len + b_len - 1;
    let transform_len = packed_transform_len(combined);
    let buffer_bytes = transform_len * std::mem::size_of::<f64>();
    let allocator = AlignedAllocator::new(options.allocator_config());
    MemoryEstimate {
        transform_len,
        buffer_bytes,
        total_bytes: LIVE_VECTORS * 2 * buffer_bytes,
        mapped: allocator.uses_mapping(buffer_bytes),
    }
}
