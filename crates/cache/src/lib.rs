//! Cycle-accurate model of a multi-ported set-associative cache.
//!
//! This crate implements the control logic of a parameterized read cache
//! with explicit fills and optional eviction outputs:
//! 1. **Storage:** Registered per-way tag/valid/data entries with
//!    combinational reads and next-tick writes.
//! 2. **Lookup:** Per-port tag match, priority-encoded hit way, miss flag.
//! 3. **Policies:** Pluggable per-line replacement state — tree
//!    pseudo-LRU and Available-Invalidated.
//! 4. **Handlers:** Per-port fill handlers (miss detection, allocation,
//!    eviction output) and read handlers (hit data, read-with-invalidate).
//! 5. **Cycle model:** One `step` per clock: combinational outputs from
//!    the current registered state, then all state updates commit.
//!
//! There is no write-back, no dirty tracking, and no coherence; the cache
//! is a building block for larger memory-hierarchy models.

/// Cache top, match engine, and per-port handlers.
pub mod cache;
/// Common types (geometry, encoding, construction errors).
pub mod common;
/// Configuration structures and enums.
pub mod config;
/// Replacement policies and their per-line capability trait.
pub mod policies;
/// Port bundle value types (fill, read, evict, access records).
pub mod ports;
/// Cache event counters.
pub mod stats;
/// Registered storage arrays.
pub mod storage;

/// Cache top; construct with [`AssocCache::new`] and drive with
/// [`AssocCache::step`].
pub use crate::cache::AssocCache;
/// Root configuration type; use `CacheConfig::default()` or deserialize
/// from JSON.
pub use crate::config::{CacheConfig, PolicyKind};
/// Construction-time error type.
pub use crate::common::ConfigError;
/// Per-cycle port bundles.
pub use crate::ports::{CycleInput, CycleOutput, EvictNotice, FillRequest, ReadRequest, ReadResponse};
/// Event counters.
pub use crate::stats::CacheStats;
