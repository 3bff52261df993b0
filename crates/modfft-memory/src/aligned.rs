//! Aligned allocator for transform buffers.
//!
//! Requests at or above the mapping threshold are served from anonymous
//! memory mappings advised for transparent huge pages and pre-faulted, so the
//! page-fault and TLB cost of a large transform is paid once up front.
//! Smaller requests use the heap; the element type's own alignment (for lane
//! types, `#[repr(align(32))]`) carries the alignment guarantee there.

use std::fmt;
use std::io;
use std::mem::{align_of, size_of};
use std::ops::{Deref, DerefMut};

use bytemuck::Pod;
use memmap2::{MmapMut, MmapOptions};
use tracing::{trace, warn};

use crate::stats::{AllocStats, AtomicAllocStats};

/// Alignment, in bytes, that every buffer size is padded to.
pub const ALIGN: usize = 32;

/// One mebibyte, the default mapping threshold.
pub const MEGABYTE: usize = 1 << 20;

/// Round a byte count up to a multiple of [`ALIGN`].
const fn round_up(bytes: usize) -> usize {
    bytes.div_ceil(ALIGN) * ALIGN
}

/// Allocator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Padded request size (bytes) from which mappings are used.
    pub mmap_threshold: usize,
    /// Advise the kernel to back mappings with transparent huge pages.
    pub huge_pages: bool,
    /// Pre-fault the pages of a mapping when it is created.
    pub populate: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            mmap_threshold: MEGABYTE,
            huge_pages: true,
            populate: true,
        }
    }
}

enum Storage<T> {
    Heap(Vec<T>),
    Mapped(MmapMut),
}

/// A zero-initialised buffer of `Pod` elements owned by whoever allocated it.
///
/// Dropping the buffer releases it through the same branch that produced it:
/// a mapping is unmapped, a heap vector is freed.
pub struct AlignedBuffer<T: Pod> {
    storage: Storage<T>,
    len: usize,
}

impl<T: Pod> AlignedBuffer<T> {
    /// Whether the buffer lives in an anonymous mapping.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        matches!(self.storage, Storage::Mapped(_))
    }

    /// Size of the element data in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.len * size_of::<T>()
    }
}

impl<T: Pod> Default for AlignedBuffer<T> {
    fn default() -> Self {
        Self {
            storage: Storage::Heap(Vec::new()),
            len: 0,
        }
    }
}

impl<T: Pod> Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        match &self.storage {
            Storage::Heap(values) => values,
            Storage::Mapped(map) => bytemuck::cast_slice(&map[..self.len * size_of::<T>()]),
        }
    }
}

impl<T: Pod> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        let bytes = self.len * size_of::<T>();
        match &mut self.storage {
            Storage::Heap(values) => values,
            Storage::Mapped(map) => bytemuck::cast_slice_mut(&mut map[..bytes]),
        }
    }
}

impl<T: Pod> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("mapped", &self.is_mapped())
            .finish()
    }
}

/// Allocator choosing between anonymous mappings and the heap by size.
pub struct AlignedAllocator {
    config: AllocatorConfig,
    stats: AtomicAllocStats,
}

impl AlignedAllocator {
    /// Create an allocator with the given settings.
    #[must_use]
    pub fn new(config: AllocatorConfig) -> Self {
        Self {
            config,
            stats: AtomicAllocStats::new(),
        }
    }

    /// The settings this allocator was built with.
    #[must_use]
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Whether a request of `bytes` bytes would be served by a mapping.
    #[must_use]
    pub fn uses_mapping(&self, bytes: usize) -> bool {
        bytes > 0 && round_up(bytes) >= self.config.mmap_threshold
    }

    /// Allocate `len` zeroed elements.
    ///
    /// A failed mapping is not fatal: it is logged and the heap serves the
    /// request instead.
    pub fn allocate<T: Pod>(&self, len: usize) -> AlignedBuffer<T> {
        let bytes = len * size_of::<T>();
        if size_of::<T>() > 0 && self.uses_mapping(bytes) {
            match self.map(round_up(bytes)) {
                Ok(map) => {
                    trace!(bytes, "serving buffer from anonymous mapping");
                    self.stats.record_mapped(bytes);
                    return AlignedBuffer {
                        storage: Storage::Mapped(map),
                        len,
                    };
                }
                Err(err) => {
                    warn!(%err, bytes, "anonymous mapping failed, falling back to heap");
                    self.stats.record_fallback();
                }
            }
        }
        self.stats.record_heap();
        AlignedBuffer {
            storage: Storage::Heap(vec![T::zeroed(); len]),
            len,
        }
    }

    /// Return a buffer. Release mirrors the branch that allocated it.
    pub fn deallocate<T: Pod>(&self, buffer: AlignedBuffer<T>) {
        if buffer.len > 0 {
            self.stats.record_release();
        }
        drop(buffer);
    }

    /// Return a snapshot of allocation statistics.
    #[must_use]
    pub fn stats(&self) -> AllocStats {
        self.stats.snapshot()
    }

    /// Reset allocation statistics counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    fn map(&self, bytes: usize) -> io::Result<MmapMut> {
        let mut options = MmapOptions::new();
        options.len(bytes);
        if self.config.populate {
            options.populate();
        }
        let map = options.map_anon()?;
        debug_assert_eq!(map.as_ptr() as usize % ALIGN, 0);
        #[cfg(target_os = "linux")]
        if self.config.huge_pages {
            // Advice only; a kernel without THP support still gives us memory.
            if let Err(err) = map.advise(memmap2::Advice::HugePage) {
                trace!(%err, "huge page advice rejected");
            }
        }
        Ok(map)
    }
}

impl Default for AlignedAllocator {
    fn default() -> Self {
        Self::new(AllocatorConfig::default())
    }
}

const _: () = assert!(ALIGN >= align_of::<usize>() && ALIGN.is_power_of_two());
