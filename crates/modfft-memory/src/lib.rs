//! # modfft-memory
//!
//! Buffer allocation for the `modfft` workspace.
//!
//! Provides an aligned allocator that serves large requests from anonymous
//! huge-page mappings and small ones from the heap, plus lock-free
//! allocation statistics.
#![warn(missing_docs)]

pub mod aligned;
pub mod stats;

pub use aligned::{AlignedAllocator, AlignedBuffer, AllocatorConfig, ALIGN, MEGABYTE};
pub use stats::{AllocStats, AtomicAllocStats};
