//! Multi-Port Cycle Tests.
//!
//! Verifies concurrent port behavior within one cycle: distinct victims
//! for simultaneous allocators, fill/read interaction, and cross-port
//! invalidate visibility.

use waycache_core::{
    AssocCache, CacheConfig, CycleInput, FillRequest, PolicyKind, ReadRequest,
};

fn cache(ways: usize, lines: usize, fill_ports: usize, read_ports: usize, policy: PolicyKind) -> AssocCache {
    let cfg = CacheConfig { ways, lines, fill_ports, read_ports, policy, ..CacheConfig::default() };
    match AssocCache::new(&cfg) {
        Ok(cache) => cache,
        Err(err) => panic!("config rejected: {err}"),
    }
}

/// Ways of `line` currently holding `tag`, lowest first.
fn ways_holding(cache: &AssocCache, line: usize, tag_addr: u64) -> Vec<usize> {
    let geom = *cache.geometry();
    (0..geom.ways)
        .filter(|&way| {
            let e = cache.peek_entry(line, way);
            e.valid && e.tag == geom.tag_of(tag_addr)
        })
        .collect()
}

// ══════════════════════════════════════════════════════════
// 1. Simultaneous allocations
// ══════════════════════════════════════════════════════════

#[test]
fn two_fill_ports_same_line_get_distinct_ways_under_plru() {
    let mut c = cache(4, 1, 2, 1, PolicyKind::PseudoLru);
    let mut input = CycleInput::idle(2, 1);
    input.fills[0] = FillRequest::install(0x100, 0xA);
    input.fills[1] = FillRequest::install(0x200, 0xB);
    let _ = c.step(&input);

    let a = ways_holding(&c, 0, 0x100);
    let b = ways_holding(&c, 0, 0x200);
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_ne!(a[0], b[0], "simultaneous allocators must claim distinct ways");
}

#[test]
fn two_fill_ports_same_line_get_distinct_ways_under_available() {
    let mut c = cache(4, 1, 2, 1, PolicyKind::Available);
    let mut input = CycleInput::idle(2, 1);
    input.fills[0] = FillRequest::install(0x100, 0xA);
    input.fills[1] = FillRequest::install(0x200, 0xB);
    let _ = c.step(&input);

    assert_eq!(ways_holding(&c, 0, 0x100), vec![0], "port 0 claims the lowest way");
    assert_eq!(ways_holding(&c, 0, 0x200), vec![1], "port 1 the next");
}

#[test]
fn four_simultaneous_allocators_fill_the_whole_line() {
    let mut c = cache(4, 1, 4, 1, PolicyKind::PseudoLru);
    let mut input = CycleInput::idle(4, 1);
    for (i, fill) in input.fills.iter_mut().enumerate() {
        *fill = FillRequest::install(0x1000 + i as u64, i as u64);
    }
    let _ = c.step(&input);

    let mut claimed: Vec<usize> =
        (0..4).flat_map(|i| ways_holding(&c, 0, 0x1000 + i as u64)).collect();
    claimed.sort_unstable();
    assert_eq!(claimed, vec![0, 1, 2, 3]);
}

#[test]
fn allocators_on_different_lines_do_not_interact() {
    let mut c = cache(2, 8, 2, 2, PolicyKind::Available);
    let mut input = CycleInput::idle(2, 2);
    input.fills[0] = FillRequest::install(0x10 << 3, 0xA);
    input.fills[1] = FillRequest::install((0x20 << 3) | 5, 0xB);
    let _ = c.step(&input);

    // Each line's policy saw a single allocator: both claim way 0.
    assert_eq!(ways_holding(&c, 0, 0x10 << 3), vec![0]);
    assert_eq!(ways_holding(&c, 5, (0x20 << 3) | 5), vec![0]);
}

// ══════════════════════════════════════════════════════════
// 2. Cross-port interaction within a cycle
// ══════════════════════════════════════════════════════════

#[test]
fn read_port_sees_registered_state_not_same_cycle_fills() {
    let mut c = cache(4, 1, 1, 2, PolicyKind::Available);
    let mut input = CycleInput::idle(1, 2);
    input.fills[0] = FillRequest::install(0x100, 0xA);
    input.reads[0] = ReadRequest::new(0x100);
    let out = c.step(&input);
    assert!(!out.reads[0].valid);

    let mut input = CycleInput::idle(1, 2);
    input.reads[1] = ReadRequest::new(0x100);
    let out = c.step(&input);
    assert!(out.reads[1].valid);
    assert_eq!(out.reads[1].data, 0xA);
}

#[test]
fn invalidating_port_frees_the_way_for_an_allocating_port() {
    let mut c = cache(2, 1, 2, 1, PolicyKind::Available);
    // Fill both ways.
    let mut input = CycleInput::idle(2, 1);
    input.fills[0] = FillRequest::install(0x100, 0xA);
    input.fills[1] = FillRequest::install(0x200, 0xB);
    let _ = c.step(&input);

    // Port 0 invalidates 0x100 (way 0) while port 1 misses and allocates:
    // the allocator takes the freed way without a real eviction.
    let mut input = CycleInput::idle(2, 1);
    input.fills[0] = FillRequest::invalidate(0x100);
    input.fills[1] = FillRequest::install(0x300, 0xC);
    let out = c.step(&input);

    assert!(out.evicts[0].valid, "explicit invalidate reports its address");
    assert_eq!(out.evicts[0].addr, 0x100);
    assert!(!out.evicts[1].valid, "claiming a just-freed way is not an eviction");
    assert_eq!(ways_holding(&c, 0, 0x300), vec![0]);
    assert_eq!(ways_holding(&c, 0, 0x200), vec![1]);
}

#[test]
fn lower_port_allocation_sees_higher_port_invalidate() {
    // Invalidates are collected from every fill port before any victim is
    // chosen, so port order between the two does not matter.
    let mut c = cache(2, 1, 2, 1, PolicyKind::Available);
    let mut input = CycleInput::idle(2, 1);
    input.fills[0] = FillRequest::install(0x100, 0xA);
    input.fills[1] = FillRequest::install(0x200, 0xB);
    let _ = c.step(&input);

    let mut input = CycleInput::idle(2, 1);
    input.fills[0] = FillRequest::install(0x300, 0xC);
    input.fills[1] = FillRequest::invalidate(0x100);
    let out = c.step(&input);

    assert!(!out.evicts[0].valid, "the allocator reused the freed way");
    assert!(out.evicts[1].valid);
    assert_eq!(ways_holding(&c, 0, 0x300), vec![0]);
}

#[test]
fn two_read_ports_hit_the_same_entry() {
    let mut c = cache(4, 1, 1, 2, PolicyKind::Available);
    let mut input = CycleInput::idle(1, 2);
    input.fills[0] = FillRequest::install(0x100, 0x5A);
    let _ = c.step(&input);

    let mut input = CycleInput::idle(1, 2);
    input.reads[0] = ReadRequest::new(0x100);
    input.reads[1] = ReadRequest::new(0x100);
    let out = c.step(&input);
    assert!(out.reads[0].valid && out.reads[1].valid);
    assert_eq!(out.reads[0].data, 0x5A);
    assert_eq!(out.reads[1].data, 0x5A);
}

#[test]
fn duplicate_tags_read_back_from_the_lowest_way() {
    // Two fill ports install the same address in one cycle: both miss,
    // the policy hands out distinct ways, and the line ends up with
    // duplicate tags. Reads must deterministically serve the lowest
    // matching way.
    let mut c = cache(4, 1, 2, 1, PolicyKind::Available);
    let mut input = CycleInput::idle(2, 1);
    input.fills[0] = FillRequest::install(0x100, 0xAA);
    input.fills[1] = FillRequest::install(0x100, 0xBB);
    let _ = c.step(&input);

    assert_eq!(ways_holding(&c, 0, 0x100), vec![0, 1], "both copies landed");
    let mut input = CycleInput::idle(2, 1);
    input.reads[0] = ReadRequest::new(0x100);
    let out = c.step(&input);
    assert!(out.reads[0].valid);
    assert_eq!(out.reads[0].data, 0xAA, "way 0's copy is authoritative");
}

// ══════════════════════════════════════════════════════════
// 3. Port plumbing
// ══════════════════════════════════════════════════════════

#[test]
#[should_panic(expected = "fill port count mismatch")]
fn mismatched_fill_port_vector_panics() {
    let mut c = cache(4, 1, 2, 1, PolicyKind::Available);
    let input = CycleInput::idle(1, 1);
    let _ = c.step(&input);
}

#[test]
#[should_panic(expected = "read port count mismatch")]
fn mismatched_read_port_vector_panics() {
    let mut c = cache(4, 1, 1, 1, PolicyKind::Available);
    let input = CycleInput::idle(1, 2);
    let _ = c.step(&input);
}
