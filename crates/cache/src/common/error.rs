//! Construction-time error definitions.
//!
//! The cache has no runtime error channel: every cycle completes and every
//! alloc request is answered. The only fallible operation is construction,
//! where an inconsistent parameterization must fail fast before any state
//! is allocated.

use thiserror::Error;

/// Rejected cache parameterizations.
///
/// Returned by [`CacheConfig::geometry`](crate::config::CacheConfig::geometry)
/// and therefore by [`AssocCache::new`](crate::cache::AssocCache::new).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The cache must have at least one way per line.
    #[error("cache must have at least one way")]
    NoWays,

    /// The cache must have at least one line.
    #[error("cache must have at least one line")]
    NoLines,

    /// Per-line way state is kept in 64-bit vectors; wider associativity
    /// is rejected rather than silently truncated.
    #[error("associativity of {0} exceeds the supported maximum of 64 ways")]
    TooManyWays(usize),

    /// The pseudo-LRU tree encoding is only defined for power-of-two
    /// associativity.
    #[error("pseudo-LRU requires a power-of-two way count, got {0}")]
    PlruWaysNotPowerOfTwo(usize),

    /// Addresses are modeled in a 64-bit signal value.
    #[error("address width of {0} bits is outside the supported range 1..=64")]
    BadAddrWidth(u32),

    /// Data is modeled in a 64-bit signal value.
    #[error("data width of {0} bits is outside the supported range 1..=64")]
    BadDataWidth(u32),

    /// The address must be wide enough to carry at least one tag bit above
    /// the line index.
    #[error("address width {addr_bits} leaves no tag bits above {line_bits} line-index bits")]
    NoTagBits {
        /// Configured request address width.
        addr_bits: u32,
        /// Line-index bits derived from the line count.
        line_bits: u32,
    },

    /// A cache with neither fill nor read ports has no observable behavior.
    #[error("cache must expose at least one fill or read port")]
    NoPorts,
}
