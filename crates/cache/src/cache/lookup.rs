//! Match engine.
//!
//! Per (line, port): compare the request tag against every way's stored
//! tag, gated by the way's valid bit, and reduce the per-way hits to a
//! multi-hot vector, a priority-encoded hit way, and a miss flag. Purely
//! combinational; produces no side effects.

use crate::common::addr::Geometry;
use crate::common::encode::{one_hot, priority_encode};
use crate::storage::{RegArray, WayEntry};

/// Result of matching one request tag against one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchResult {
    /// Per-way hit vector (way `w` at bit `w`); multi-hot when duplicate
    /// tags coincide.
    pub hit_vec: u64,
    /// Lowest-indexed hitting way, or `None` on a miss. The fixed
    /// tie-break: when duplicate tags coincide, the first matching valid
    /// way is authoritative.
    pub hit_way: Option<usize>,
}

impl MatchResult {
    /// Miss flag: the exact complement of any way hitting.
    #[inline]
    pub fn miss(&self) -> bool {
        self.hit_way.is_none()
    }
}

/// Match `tag` against every way of `line`.
pub fn lookup(store: &RegArray<WayEntry>, geom: &Geometry, line: usize, tag: u64) -> MatchResult {
    let mut hit_vec = 0u64;
    for way in 0..geom.ways {
        let entry = store.read(geom.entry_index(line, way));
        if entry.valid && entry.tag == tag {
            hit_vec |= one_hot(way);
        }
    }
    MatchResult { hit_vec, hit_way: priority_encode(hit_vec) }
}
