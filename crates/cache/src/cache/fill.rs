//! Fill handler.
//!
//! For each fill port asserting `en` this cycle: detect hit or miss at the
//! request's line, drive the line's policy records, schedule the tag/valid/
//! data write for the next tick, and generate the eviction output.
//!
//! Allocation is resolved after all fill ports have been classified, per
//! line, so that simultaneous allocators on one line receive distinct
//! victims from a single policy chain.

use tracing::{debug, trace};

use super::{AssocCache, CycleRecords};
use crate::ports::{Access, CycleOutput, EvictNotice, FillRequest};
use crate::storage::WayEntry;

/// A fill port's allocation request, pending per-line victim selection.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AllocRequest {
    /// Line the fill indexed.
    pub line: usize,
    /// Fill port index.
    pub port: usize,
    /// Tag to install.
    pub tag: u64,
    /// Payload to install.
    pub data: u64,
}

impl AssocCache {
    /// Classify every enabled fill port and handle the hit paths.
    ///
    /// A fill that hits refreshes the matched way in place. An
    /// invalidating fill that hits clears the matched way's valid bit and
    /// reports the invalidated address on the eviction output. An
    /// invalidating fill that misses is a no-op. Allocating misses are
    /// queued for [`alloc_phase`](Self::alloc_phase).
    pub(crate) fn fill_phase(
        &mut self,
        fills: &[FillRequest],
        rec: &mut CycleRecords,
        out: &mut CycleOutput,
    ) {
        for (port, fill) in fills.iter().enumerate() {
            if !fill.en {
                continue;
            }
            let addr = fill.addr & self.geom.addr_mask();
            let tag = self.geom.tag_of(addr);
            let line = self.geom.line_of(addr);
            let matched = super::lookup::lookup(&self.store, &self.geom, line, tag);

            match (fill.valid, matched.hit_way) {
                (true, Some(way)) => {
                    // Refresh the resident entry.
                    rec.hits.push((line, Access::asserted(port, way)));
                    self.store.schedule(
                        self.geom.entry_index(line, way),
                        WayEntry { valid: true, tag, data: fill.data & self.geom.data_mask() },
                    );
                    self.stats.fill_hits += 1;
                    trace!(port, line, way, tag, "fill hit");
                }
                (true, None) => {
                    rec.alloc_reqs.push(AllocRequest {
                        line,
                        port,
                        tag,
                        data: fill.data & self.geom.data_mask(),
                    });
                }
                (false, Some(way)) => {
                    let idx = self.geom.entry_index(line, way);
                    let victim = *self.store.read(idx);
                    rec.invals.push((line, Access::asserted(port, way)));
                    // Tag and data stay in place; only the valid bit drops.
                    self.store.schedule(idx, WayEntry { valid: false, ..victim });
                    if self.evictions {
                        out.evicts[port] = EvictNotice { valid: true, addr, data: victim.data };
                    }
                    self.stats.invalidations += 1;
                    debug!(port, line, way, "fill invalidate");
                }
                (false, None) => {
                    // Invalidating a non-resident address touches nothing.
                }
            }
        }
    }

    /// Resolve the queued allocation requests, line by line.
    ///
    /// Each line's policy chooses victims for all of its simultaneous
    /// allocators at once (port-index order), seeing this cycle's
    /// invalidate records. A victim that currently holds valid data — and
    /// was not freed by an invalidate this cycle — is a real eviction and
    /// is reported on the allocator's eviction output with its stored tag
    /// reassembled into a full address.
    pub(crate) fn alloc_phase(&mut self, rec: &mut CycleRecords, out: &mut CycleOutput) {
        let reqs = std::mem::take(&mut rec.alloc_reqs);

        let mut lines: Vec<usize> = Vec::new();
        for req in &reqs {
            if !lines.contains(&req.line) {
                lines.push(req.line);
            }
        }

        for line in lines {
            let line_invals = CycleRecords::for_line(&rec.invals, line);
            let line_reqs: Vec<&AllocRequest> = reqs.iter().filter(|r| r.line == line).collect();
            let ways = self.policies[line].alloc_ways(line_reqs.len(), &line_invals);

            for (req, way) in line_reqs.iter().zip(ways) {
                let idx = self.geom.entry_index(line, way);
                let victim = *self.store.read(idx);
                let freed_this_cycle =
                    line_invals.iter().any(|a| a.access && a.way == way);
                let alloc_way_was_valid = victim.valid && !freed_this_cycle;

                rec.allocs.push((line, Access::asserted(req.port, way)));
                self.store
                    .schedule(idx, WayEntry { valid: true, tag: req.tag, data: req.data });
                self.stats.fill_misses += 1;
                trace!(port = req.port, line, way, tag = req.tag, "fill allocate");

                if alloc_way_was_valid {
                    self.stats.evictions += 1;
                    if self.evictions {
                        out.evicts[req.port] = EvictNotice {
                            valid: true,
                            addr: self.geom.join(victim.tag, line),
                            data: victim.data,
                        };
                    }
                    debug!(port = req.port, line, way, victim_tag = victim.tag, "evict");
                }
            }
        }
    }
}
