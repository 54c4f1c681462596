//! Available-Invalidated replacement policy.
//!
//! Tracks which ways of the line currently hold data in a `ways`-bit
//! shadow vector and allocates from the invalidated (available) ways,
//! lowest index first. The shadow is policy-local registered state: it is
//! updated by allocations and invalidations only, and is allowed to lead
//! the storage array's real valid bits by one cycle (an invalidate whose
//! valid-bit write is still in flight already frees the way here).
//!
//! Hits carry no information for this policy and are ignored.

use super::ReplacementPolicy;
use crate::common::encode::{low_mask, one_hot, priority_encode};
use crate::ports::Access;

/// Available-Invalidated state for one line.
#[derive(Clone, Debug)]
pub struct AvailablePolicy {
    ways: usize,
    /// Bit set = way currently allocated.
    shadow: u64,
    /// Last issued way per allocation port, re-presented one cycle later.
    issued: Vec<usize>,
}

impl AvailablePolicy {
    /// A new policy for `ways` ways and `alloc_ports` allocation ports,
    /// with every way available.
    pub fn new(ways: usize, alloc_ports: usize) -> Self {
        assert!(ways >= 1 && ways <= 64, "way state is kept in a 64-bit vector");
        Self {
            ways,
            shadow: 0,
            issued: vec![0; alloc_ports],
        }
    }

    /// The way issued to `port` at its most recent allocation, held stable
    /// across cycles without an allocation on that port. Downstream logic
    /// that samples one cycle after the allocation reads this.
    pub fn issued_way(&self, port: usize) -> usize {
        self.issued[port]
    }

    /// Shadow valid bits, for state inspection in tests.
    pub fn shadow(&self) -> u64 {
        self.shadow
    }

    /// Available ways after applying this cycle's invalidate records.
    fn available_after(&self, invalidates: &[Access]) -> u64 {
        let mut avail = !self.shadow & low_mask(self.ways as u32);
        for inv in invalidates.iter().filter(|i| i.access) {
            avail |= one_hot(inv.way);
        }
        avail
    }
}

impl ReplacementPolicy for AvailablePolicy {
    /// Greedy lowest-index assignment.
    ///
    /// Each port sees the available set with this cycle's invalidates
    /// applied and the claims of lower-indexed ports removed. A port that
    /// finds no available way is issued way 0; the caller detects that
    /// case by observing that the chosen way still holds valid data.
    fn alloc_ways(&self, count: usize, invalidates: &[Access]) -> Vec<usize> {
        let mut avail = self.available_after(invalidates);
        let mut ways = Vec::with_capacity(count);
        for _ in 0..count {
            match priority_encode(avail) {
                Some(way) => {
                    avail &= !one_hot(way);
                    ways.push(way);
                }
                None => ways.push(0),
            }
        }
        ways
    }

    /// Registered next-state.
    ///
    /// `shadow' = (shadow AND NOT invalidate_claim) OR alloc_claim`; an
    /// allocation into a way invalidated the same cycle stays allocated.
    /// Hits are ignored. The issued-way latch follows each allocating
    /// port.
    fn commit(&mut self, allocs: &[Access], _hits: &[Access], invalidates: &[Access]) {
        let mut inval_claim = 0u64;
        for inv in invalidates.iter().filter(|i| i.access) {
            inval_claim |= one_hot(inv.way);
        }
        let mut alloc_claim = 0u64;
        for a in allocs.iter().filter(|a| a.access) {
            alloc_claim |= one_hot(a.way);
            if a.port < self.issued.len() {
                self.issued[a.port] = a.way;
            }
        }
        self.shadow = (self.shadow & !inval_claim) | alloc_claim;
    }

    fn reset(&mut self) {
        self.shadow = 0;
        for way in &mut self.issued {
            *way = 0;
        }
    }
}
