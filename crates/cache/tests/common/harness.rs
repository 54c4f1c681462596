//! Test harness: drive a cache one operation per cycle.
//!
//! Most tests exercise a cache through its first fill port and first read
//! port, one operation per cycle. The harness wraps the port-vector
//! plumbing so a test reads as a sequence of fills, invalidates, and
//! reads; multi-port tests build [`CycleInput`] values directly instead.

use waycache_core::{
    AssocCache, CacheConfig, CycleInput, CycleOutput, EvictNotice, FillRequest, ReadRequest,
    ReadResponse,
};

/// A cache plus its configured port counts.
pub struct CacheHarness {
    /// The cache under test.
    pub cache: AssocCache,
    fill_ports: usize,
    read_ports: usize,
}

impl CacheHarness {
    /// Builds the cache for `config`, panicking on a rejected
    /// configuration (harness callers always pass valid ones).
    pub fn new(config: &CacheConfig) -> Self {
        let cache = match AssocCache::new(config) {
            Ok(cache) => cache,
            Err(err) => panic!("harness config rejected: {err}"),
        };
        Self { cache, fill_ports: config.fill_ports, read_ports: config.read_ports }
    }

    /// An all-idle input sized for this cache.
    pub fn idle_input(&self) -> CycleInput {
        CycleInput::idle(self.fill_ports, self.read_ports)
    }

    /// One idle cycle.
    pub fn tick(&mut self) -> CycleOutput {
        let input = self.idle_input();
        self.cache.step(&input)
    }

    /// Install `(addr, data)` through fill port 0; returns the port's
    /// eviction notice for the cycle.
    pub fn fill(&mut self, addr: u64, data: u64) -> EvictNotice {
        let mut input = self.idle_input();
        input.fills[0] = FillRequest::install(addr, data);
        self.cache.step(&input).evicts[0]
    }

    /// Invalidate `addr` through fill port 0; returns the port's eviction
    /// notice for the cycle.
    pub fn invalidate(&mut self, addr: u64) -> EvictNotice {
        let mut input = self.idle_input();
        input.fills[0] = FillRequest::invalidate(addr);
        self.cache.step(&input).evicts[0]
    }

    /// Read `addr` through read port 0.
    pub fn read(&mut self, addr: u64) -> ReadResponse {
        let mut input = self.idle_input();
        input.reads[0] = ReadRequest::new(addr);
        self.cache.step(&input).reads[0]
    }

    /// Read-with-invalidate `addr` through read port 0.
    pub fn read_invalidate(&mut self, addr: u64) -> ReadResponse {
        let mut input = self.idle_input();
        input.reads[0] = ReadRequest::with_invalidate(addr);
        self.cache.step(&input).reads[0]
    }
}
