//! Cache top: storage, per-line policies, and per-port handlers.
//!
//! This module assembles the set-associative cache. It instantiates the
//! flat storage arena, one replacement-policy instance per line, and the
//! per-port fill and read handlers, and drives them one clock cycle at a
//! time:
//! 1. **Combinational phase:** deferred read-invalidate actions, fill
//!    classification, allocation resolution, and read responses, all
//!    computed from the current registered state and this cycle's inputs.
//! 2. **Tick:** scheduled storage writes, policy next-state, and the
//!    read-invalidate latches commit together.

/// Match engine (tag compare, hit vector, priority-encoded hit way).
pub mod lookup;

mod fill;
mod read;

use crate::common::addr::Geometry;
use crate::common::error::ConfigError;
use crate::config::{CacheConfig, PolicyKind};
use crate::policies::{AvailablePolicy, PlruPolicy, ReplacementPolicy};
use crate::ports::{Access, CycleInput, CycleOutput, EvictNotice, ReadResponse};
use crate::stats::CacheStats;
use crate::storage::{RegArray, WayEntry};

pub(crate) use fill::AllocRequest;

/// One cycle's access records, collected by the handlers and folded into
/// the per-line policies at the tick.
///
/// Records are keyed by line; each carries the global port index (fill
/// ports first, then read ports). Plain value storage — the policies that
/// consume these never own them.
#[derive(Debug, Default)]
pub(crate) struct CycleRecords {
    /// Hit records from fill refreshes and read hits.
    pub hits: Vec<(usize, Access)>,
    /// Invalidate records from invalidating fills and deferred
    /// read-invalidates.
    pub invals: Vec<(usize, Access)>,
    /// Alloc records with the policy-chosen ways.
    pub allocs: Vec<(usize, Access)>,
    /// Pending allocation requests awaiting per-line victim selection.
    pub alloc_reqs: Vec<AllocRequest>,
}

impl CycleRecords {
    /// Access records in `list` for `line`, in assertion (port) order.
    fn for_line(list: &[(usize, Access)], line: usize) -> Vec<Access> {
        list.iter()
            .filter(|(l, _)| *l == line)
            .map(|&(_, access)| access)
            .collect()
    }
}

/// Multi-ported, parameterized set-associative read cache.
///
/// Constructed from a [`CacheConfig`]; stepped one clock cycle at a time
/// with [`step`](Self::step). All combinational outputs of a cycle are in
/// the returned [`CycleOutput`]; all registered state advances when the
/// call returns.
#[derive(Debug)]
pub struct AssocCache {
    geom: Geometry,
    fill_ports: usize,
    read_ports: usize,
    evictions: bool,
    read_invalidate: bool,
    store: RegArray<WayEntry>,
    policies: Vec<Box<dyn ReplacementPolicy>>,
    /// Per read port: deferred read-with-invalidate target, one cycle deep.
    rwi: Vec<Option<(usize, usize)>>,
    stats: CacheStats,
}

impl AssocCache {
    /// Builds a cache for `config`.
    ///
    /// Derives the geometry, allocates the per-way storage arena, and
    /// instantiates one replacement-policy instance per line.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration is rejected; see
    /// [`CacheConfig::geometry`].
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        let geom = config.geometry()?;

        let policies: Vec<Box<dyn ReplacementPolicy>> = (0..geom.lines)
            .map(|_| -> Box<dyn ReplacementPolicy> {
                match config.policy {
                    PolicyKind::PseudoLru => Box::new(PlruPolicy::new(geom.ways)),
                    PolicyKind::Available => {
                        Box::new(AvailablePolicy::new(geom.ways, config.fill_ports))
                    }
                }
            })
            .collect();

        Ok(Self {
            geom,
            fill_ports: config.fill_ports,
            read_ports: config.read_ports,
            evictions: config.evictions,
            read_invalidate: config.read_invalidate,
            store: RegArray::new(geom.entries(), WayEntry::default()),
            policies,
            rwi: vec![None; config.read_ports],
            stats: CacheStats::default(),
        })
    }

    /// Advances the cache by one clock cycle.
    ///
    /// Computes every combinational output from the current registered
    /// state and `input`, then commits all scheduled state updates. The
    /// deferred read-invalidate clears are asserted before fill writes,
    /// so a fill installing into a just-freed way wins the tick.
    ///
    /// # Panics
    ///
    /// Panics when `input`'s port vectors do not match the configured
    /// port counts.
    pub fn step(&mut self, input: &CycleInput) -> CycleOutput {
        assert_eq!(input.fills.len(), self.fill_ports, "fill port count mismatch");
        assert_eq!(input.reads.len(), self.read_ports, "read port count mismatch");

        let mut rec = CycleRecords::default();
        let mut out = CycleOutput {
            reads: vec![ReadResponse::default(); self.read_ports],
            evicts: vec![EvictNotice::default(); self.fill_ports],
        };

        self.rwi_phase(&mut rec);
        self.fill_phase(&input.fills, &mut rec, &mut out);
        self.alloc_phase(&mut rec, &mut out);
        self.read_phase(&input.reads, &mut rec, &mut out);
        self.commit_phase(&rec);

        out
    }

    /// Synchronous reset: all entries invalid, policies and latches at
    /// their deterministic reset state. Statistics are host bookkeeping
    /// and survive.
    pub fn reset(&mut self) {
        self.store.reset_to(WayEntry::default());
        for policy in &mut self.policies {
            policy.reset();
        }
        for latch in &mut self.rwi {
            *latch = None;
        }
    }

    /// The derived geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geom
    }

    /// Accumulated event counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Registered entry at `(line, way)`, without touching any state.
    ///
    /// Observability hook for tests and harnesses.
    pub fn peek_entry(&self, line: usize, way: usize) -> WayEntry {
        *self.store.read(self.geom.entry_index(line, way))
    }

    /// Commit the tick: storage writes, policy next-state, cycle counter.
    fn commit_phase(&mut self, rec: &CycleRecords) {
        self.store.tick();

        let mut touched: Vec<usize> = Vec::new();
        for &(line, _) in rec.allocs.iter().chain(&rec.hits).chain(&rec.invals) {
            if !touched.contains(&line) {
                touched.push(line);
            }
        }
        for line in touched {
            let allocs = CycleRecords::for_line(&rec.allocs, line);
            let hits = CycleRecords::for_line(&rec.hits, line);
            let invals = CycleRecords::for_line(&rec.invals, line);
            self.policies[line].commit(&allocs, &hits, &invals);
        }

        self.stats.cycles += 1;
    }
}
