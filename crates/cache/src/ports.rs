//! Port bundle value types.
//!
//! The cache's boundary is a set of port bundles sampled once per cycle:
//! fill requests in, read requests in, read responses and eviction notices
//! out. These are plain value types with `Default` as the idle state, in
//! the same spirit as pipeline-latch entries: separate storage for the
//! combinational drivers (a cycle's input/output structs) and the
//! registered state (inside the cache), with no shared ownership.

/// One fill port's request for the current cycle.
///
/// `en = true, valid = true` installs (or refreshes) `addr` with `data`;
/// `en = true, valid = false` invalidates `addr` if present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillRequest {
    /// Port enable; when false the port is idle this cycle.
    pub en: bool,
    /// Fill-valid: install when true, invalidate when false.
    pub valid: bool,
    /// Request address.
    pub addr: u64,
    /// Payload to install (ignored on invalidate).
    pub data: u64,
}

impl FillRequest {
    /// An idle fill port.
    pub const fn idle() -> Self {
        Self { en: false, valid: false, addr: 0, data: 0 }
    }

    /// Install (or refresh) `addr` with `data`.
    pub const fn install(addr: u64, data: u64) -> Self {
        Self { en: true, valid: true, addr, data }
    }

    /// Invalidate `addr` if it is present.
    pub const fn invalidate(addr: u64) -> Self {
        Self { en: true, valid: false, addr, data: 0 }
    }
}

/// One read port's request for the current cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadRequest {
    /// Port enable; when false the port is idle this cycle.
    pub en: bool,
    /// Request address.
    pub addr: u64,
    /// Read-with-invalidate: on a hit, also clear the matched entry's
    /// valid bit one cycle later.
    pub invalidate: bool,
}

impl ReadRequest {
    /// An idle read port.
    pub const fn idle() -> Self {
        Self { en: false, addr: 0, invalidate: false }
    }

    /// A plain read of `addr`.
    pub const fn new(addr: u64) -> Self {
        Self { en: true, addr, invalidate: false }
    }

    /// A read of `addr` that invalidates the matched entry on a hit.
    pub const fn with_invalidate(addr: u64) -> Self {
        Self { en: true, addr, invalidate: true }
    }
}

/// One read port's combinational response.
///
/// `valid = false, data = 0` on a miss or an idle port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadResponse {
    /// Hit flag.
    pub valid: bool,
    /// Payload of the matched way on a hit, zero otherwise.
    pub data: u64,
}

/// Eviction notice paired with a fill port.
///
/// Asserted combinationally in the cycle a fill displaces a valid victim
/// or explicitly invalidates a valid entry. `addr` is the full address of
/// the displaced entry (reassembled from its stored tag) in the eviction
/// case, and the fill's own address in the explicit-invalidate case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvictNotice {
    /// Whether an eviction or invalidation is being reported this cycle.
    pub valid: bool,
    /// Address of the displaced or invalidated entry.
    pub addr: u64,
    /// Payload read from the victim way.
    pub data: u64,
}

/// Per-line, per-port access record consumed by replacement policies.
///
/// Carries the global port index (fill ports first, then read ports), the
/// touched way, and the access flag. Policies ignore records with
/// `access = false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Access {
    /// Global port index of the driver.
    pub port: usize,
    /// Way touched (for allocs, the way the policy chose).
    pub way: usize,
    /// Whether the record is asserted this cycle.
    pub access: bool,
}

impl Access {
    /// An asserted access record.
    pub const fn asserted(port: usize, way: usize) -> Self {
        Self { port, way, access: true }
    }
}

/// All port inputs for one cycle.
///
/// The vector lengths must match the cache's configured port counts.
#[derive(Clone, Debug, Default)]
pub struct CycleInput {
    /// One request per fill port.
    pub fills: Vec<FillRequest>,
    /// One request per read port.
    pub reads: Vec<ReadRequest>,
}

impl CycleInput {
    /// An all-idle input for the given port counts.
    pub fn idle(fill_ports: usize, read_ports: usize) -> Self {
        Self {
            fills: vec![FillRequest::idle(); fill_ports],
            reads: vec![ReadRequest::idle(); read_ports],
        }
    }
}

/// All combinational port outputs for one cycle.
#[derive(Clone, Debug, Default)]
pub struct CycleOutput {
    /// One response per read port.
    pub reads: Vec<ReadResponse>,
    /// One notice per fill port; all-deasserted when the cache was built
    /// without eviction outputs.
    pub evicts: Vec<EvictNotice>,
}
