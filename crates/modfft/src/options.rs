//! Multiplication options and configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_LEN, DEFAULT_MMAP_THRESHOLD, DEFAULT_NAIVE_THRESHOLD};

/// Options for polynomial multiplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FftOptions {
    /// Operand length below which direct convolution is used.
    pub naive_threshold: usize,
    /// Maximum polynomial length covered by the cached root table.
    pub max_len: usize,
    /// Buffer size (bytes) from which transform storage is mapped.
    pub mmap_threshold: usize,
    /// Advise huge pages for mapped buffers.
    pub huge_pages: bool,
}

impl Default for FftOptions {
    fn default() -> Self {
        Self {
            naive_threshold: DEFAULT_NAIVE_THRESHOLD,
            max_len: DEFAULT_MAX_LEN,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
            huge_pages: true,
        }
    }
}

impl FftOptions {
    /// Normalize options, applying defaults where values are zero and
    /// rounding `max_len` up to a power of two.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.naive_threshold == 0 {
            self.naive_threshold = DEFAULT_NAIVE_THRESHOLD;
        }
        if self.max_len == 0 {
            self.max_len = DEFAULT_MAX_LEN;
        }
        self.max_len = self.max_len.max(crate::constants::MIN_TRANSFORM_LEN).next_power_of_two();
        if self.mmap_threshold == 0 {
            self.mmap_threshold = DEFAULT_MMAP_THRESHOLD;
        }
        self
    }

    /// Options that send every non-empty product through the transform.
    #[must_use]
    pub fn transform_only() -> Self {
        Self {
            naive_threshold: 1,
            ..Self::default()
        }
    }

    /// Allocator settings derived from these options.
    #[must_use]
    pub fn allocator_config(&self) -> modfft_memory::AllocatorConfig {
        modfft_memory::AllocatorConfig {
            mmap_threshold: self.mmap_threshold,
            huge_pages: self.huge_pages,
            ..modfft_memory::AllocatorConfig::default()
        }
    }
}
