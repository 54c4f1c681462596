//! Cache geometry and request-address decomposition.
//!
//! Every request address splits as `[tag | line]`: the low `line_bits` bits
//! select the line, the remaining high bits are the tag stored alongside
//! each way's entry. This module derives the widths once at construction
//! and provides the split/join and flat-arena index helpers the rest of
//! the crate uses.

use super::encode::low_mask;
use super::error::ConfigError;

/// Derived cache geometry, fixed at construction.
///
/// Validates the raw parameterization (way/line counts, address and data
/// widths) and precomputes the widths and masks every per-cycle path needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Number of ways per line.
    pub ways: usize,
    /// Number of lines.
    pub lines: usize,
    /// Request address width in bits.
    pub addr_bits: u32,
    /// Payload width in bits.
    pub data_bits: u32,
    /// Line-index bits: `ceil(log2(lines))`.
    pub line_bits: u32,
    /// Tag bits: `addr_bits - line_bits`.
    pub tag_bits: u32,
    /// Way-index bits: `ceil(log2(ways))`.
    pub way_bits: u32,
}

/// `ceil(log2(n))` for `n >= 1`.
fn index_bits(n: usize) -> u32 {
    n.next_power_of_two().trailing_zeros()
}

impl Geometry {
    /// Derives and validates the geometry for the given parameterization.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `ways` or `lines` is zero, `ways`
    /// exceeds 64, an address or data width is outside `1..=64`, or the
    /// address width leaves no tag bits above the line index.
    pub fn new(ways: usize, lines: usize, addr_bits: u32, data_bits: u32) -> Result<Self, ConfigError> {
        if ways == 0 {
            return Err(ConfigError::NoWays);
        }
        if lines == 0 {
            return Err(ConfigError::NoLines);
        }
        if ways > 64 {
            return Err(ConfigError::TooManyWays(ways));
        }
        if addr_bits == 0 || addr_bits > 64 {
            return Err(ConfigError::BadAddrWidth(addr_bits));
        }
        if data_bits == 0 || data_bits > 64 {
            return Err(ConfigError::BadDataWidth(data_bits));
        }

        let line_bits = index_bits(lines);
        if addr_bits <= line_bits {
            return Err(ConfigError::NoTagBits { addr_bits, line_bits });
        }

        Ok(Self {
            ways,
            lines,
            addr_bits,
            data_bits,
            line_bits,
            tag_bits: addr_bits - line_bits,
            way_bits: index_bits(ways),
        })
    }

    /// Mask covering the configured address width.
    #[inline]
    pub fn addr_mask(&self) -> u64 {
        low_mask(self.addr_bits)
    }

    /// Mask covering the configured data width.
    #[inline]
    pub fn data_mask(&self) -> u64 {
        low_mask(self.data_bits)
    }

    /// Line index selected by `addr`.
    ///
    /// The index is taken modulo the line count so that a non-power-of-two
    /// line count still maps every address onto a real line.
    #[inline]
    pub fn line_of(&self, addr: u64) -> usize {
        ((addr & low_mask(self.line_bits)) as usize) % self.lines
    }

    /// Tag carried by `addr` (the address bits above the line index).
    #[inline]
    pub fn tag_of(&self, addr: u64) -> u64 {
        (addr & self.addr_mask()) >> self.line_bits
    }

    /// Reassembles an address from a stored tag and a line index.
    ///
    /// Used to report the full address of an evicted entry.
    #[inline]
    pub fn join(&self, tag: u64, line: usize) -> u64 {
        ((tag << self.line_bits) | line as u64) & self.addr_mask()
    }

    /// Flat storage-arena index of `(line, way)`.
    #[inline]
    pub fn entry_index(&self, line: usize, way: usize) -> usize {
        debug_assert!(line < self.lines, "line {line} out of range");
        debug_assert!(way < self.ways, "way {way} out of range");
        line * self.ways + way
    }

    /// Total number of `(line, way)` entries.
    #[inline]
    pub fn entries(&self) -> usize {
        self.lines * self.ways
    }
}
