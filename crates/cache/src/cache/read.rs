//! Read handler.
//!
//! For each read port asserting `en` this cycle: match the request against
//! the line, drive the response valid/data on a hit, and record the hit
//! for the line's policy. A hitting read-with-invalidate latches its
//! (line, way) for one cycle; the latched value drives both the valid-bit
//! clear and the policy invalidate record in the following cycle, keeping
//! the valid-bit storage free of same-cycle read/write hazards.

use tracing::trace;

use super::{AssocCache, CycleRecords};
use crate::ports::{Access, CycleOutput, ReadRequest, ReadResponse};
use crate::storage::WayEntry;

impl AssocCache {
    /// Apply the read-with-invalidate latches armed last cycle.
    ///
    /// Runs before the fill handlers so the deferred valid-bit clears are
    /// first in the write queue; a fill allocating the freed way in this
    /// same cycle overwrites the clear at the tick.
    pub(crate) fn rwi_phase(&mut self, rec: &mut CycleRecords) {
        for port in 0..self.read_ports {
            if let Some((line, way)) = self.rwi[port].take() {
                let idx = self.geom.entry_index(line, way);
                let entry = *self.store.read(idx);
                rec.invals.push((line, Access::asserted(self.fill_ports + port, way)));
                self.store.schedule(idx, WayEntry { valid: false, ..entry });
                trace!(port, line, way, "deferred read-invalidate clear");
            }
        }
    }

    /// Serve every enabled read port from the current registered state.
    ///
    /// A miss drives `valid = 0, data = 0` and mutates nothing.
    pub(crate) fn read_phase(
        &mut self,
        reads: &[ReadRequest],
        rec: &mut CycleRecords,
        out: &mut CycleOutput,
    ) {
        for (port, req) in reads.iter().enumerate() {
            if !req.en {
                continue;
            }
            let addr = req.addr & self.geom.addr_mask();
            let tag = self.geom.tag_of(addr);
            let line = self.geom.line_of(addr);
            let matched = super::lookup::lookup(&self.store, &self.geom, line, tag);

            if let Some(way) = matched.hit_way {
                let entry = self.store.read(self.geom.entry_index(line, way));
                out.reads[port] = ReadResponse { valid: true, data: entry.data };
                rec.hits.push((line, Access::asserted(self.fill_ports + port, way)));
                self.stats.read_hits += 1;
                trace!(port, line, way, tag, "read hit");

                if self.read_invalidate && req.invalidate {
                    self.rwi[port] = Some((line, way));
                    self.stats.read_invalidates += 1;
                }
            } else {
                self.stats.read_misses += 1;
                trace!(port, line, tag, "read miss");
            }
        }
    }
}
