//! Cache configuration.
//!
//! This module defines the structures and enums used to parameterize a
//! cache instance. It provides:
//! 1. **Defaults:** Baseline geometry and port counts.
//! 2. **Structures:** The `CacheConfig` handed to the cache constructor.
//! 3. **Enums:** Replacement-policy selection.
//!
//! Configuration is supplied in code or deserialized from JSON; use
//! `CacheConfig::default()` for the baseline instance.

use serde::Deserialize;

use crate::common::addr::Geometry;
use crate::common::error::ConfigError;

/// Default configuration constants for the cache model.
mod defaults {
    /// Default associativity (4 ways per line).
    pub const WAYS: usize = 4;

    /// Default line count (64 lines).
    pub const LINES: usize = 64;

    /// Default request address width in bits.
    pub const ADDR_BITS: u32 = 32;

    /// Default payload width in bits.
    pub const DATA_BITS: u32 = 32;

    /// Default fill port count.
    pub const FILL_PORTS: usize = 1;

    /// Default read port count.
    pub const READ_PORTS: usize = 1;
}

/// Replacement policy selection.
///
/// Specifies the algorithm each line uses to choose a victim way when an
/// allocating fill misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PolicyKind {
    /// Tree-based pseudo-LRU.
    ///
    /// Approximates least-recently-used with `ways - 1` state bits per
    /// line. Requires a power-of-two way count.
    #[default]
    #[serde(alias = "Plru", alias = "PLRU")]
    PseudoLru,

    /// Available-Invalidated.
    ///
    /// Allocates from the currently-invalidated ways, lowest index first,
    /// falling back to way 0 (a forced eviction) when every way holds
    /// data.
    #[serde(alias = "AvailableInvalidated")]
    Available,
}

/// Cache parameterization.
///
/// All fields have defaults, so a config can be built with struct-update
/// syntax or deserialized from JSON with only the overridden fields
/// present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Ways per line.
    pub ways: usize,
    /// Number of lines.
    pub lines: usize,
    /// Request address width in bits (1..=64).
    pub addr_bits: u32,
    /// Payload width in bits (1..=64).
    pub data_bits: u32,
    /// Number of fill ports.
    pub fill_ports: usize,
    /// Number of read ports.
    pub read_ports: usize,
    /// Whether each fill port carries a paired eviction output.
    pub evictions: bool,
    /// Whether read ports honor the read-with-invalidate flag.
    pub read_invalidate: bool,
    /// Replacement policy used by every line.
    pub policy: PolicyKind,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ways: defaults::WAYS,
            lines: defaults::LINES,
            addr_bits: defaults::ADDR_BITS,
            data_bits: defaults::DATA_BITS,
            fill_ports: defaults::FILL_PORTS,
            read_ports: defaults::READ_PORTS,
            evictions: true,
            read_invalidate: true,
            policy: PolicyKind::default(),
        }
    }
}

impl CacheConfig {
    /// Validates the configuration and derives the cache geometry.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for zero ways/lines, more than 64 ways,
    /// address or data widths outside `1..=64`, an address too narrow to
    /// carry a tag, a cache with no ports at all, or pseudo-LRU with a
    /// non-power-of-two way count.
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        if self.fill_ports == 0 && self.read_ports == 0 {
            return Err(ConfigError::NoPorts);
        }
        if self.policy == PolicyKind::PseudoLru && self.ways != 0 && !self.ways.is_power_of_two() {
            return Err(ConfigError::PlruWaysNotPowerOfTwo(self.ways));
        }
        Geometry::new(self.ways, self.lines, self.addr_bits, self.data_bits)
    }
}
