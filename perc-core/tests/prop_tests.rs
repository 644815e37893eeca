//! Property-based tests for perc-core.
//!
//! Uses proptest to verify the codec bijection, the DSU laws (idempotent
//! find, order-independent union, boundary sign correctness), and the
//! histogram algebra across random inputs.

use proptest::prelude::*;

use perc_core::sampler::open_threshold;
use perc_core::{EdgeSampler, Forest, Histogram, IndexedSampler, Lattice};

/// Forest over L = 4 with every site made; small enough to scan
/// exhaustively inside a proptest case.
fn made_forest() -> Forest {
    let mut forest = Forest::new(Lattice::new(2)).unwrap();
    for idx in 0..forest.len() as u64 {
        forest.make_set(idx);
    }
    forest
}

fn canonical_partition(forest: &Forest) -> Vec<u64> {
    let len = forest.len() as u64;
    let mut first_member = vec![u64::MAX; forest.len()];
    let mut labels = vec![0u64; forest.len()];
    for idx in 0..len {
        let root = forest.find_const(idx) as usize;
        if first_member[root] == u64::MAX {
            first_member[root] = idx;
        }
        labels[idx as usize] = first_member[root];
    }
    labels
}

proptest! {
    // =========================================================================
    // lattice.rs: codec bijection
    // =========================================================================

    #[test]
    fn prop_encode_decode_roundtrip(
        cube_pow in 1u32..=6,
        raw in any::<(u32, u32, u32)>()
    ) {
        let lat = Lattice::new(cube_pow);
        let mask = lat.side() - 1;
        let (x, y, z) = (raw.0 & mask, raw.1 & mask, raw.2 & mask);

        let idx = lat.encode(x, y, z);
        prop_assert!(idx < lat.num_sites());
        prop_assert_eq!(lat.decode(idx), (x, y, z));
    }

    #[test]
    fn prop_encode_is_injective(
        a in any::<(u32, u32, u32)>(),
        b in any::<(u32, u32, u32)>()
    ) {
        let lat = Lattice::new(5);
        let mask = lat.side() - 1;
        let a = (a.0 & mask, a.1 & mask, a.2 & mask);
        let b = (b.0 & mask, b.1 & mask, b.2 & mask);

        let ia = lat.encode(a.0, a.1, a.2);
        let ib = lat.encode(b.0, b.1, b.2);
        prop_assert_eq!(a == b, ia == ib);
    }

    // =========================================================================
    // dsu.rs: quantified invariants
    // =========================================================================

    #[test]
    fn prop_find_is_idempotent_after_random_unions(
        edges in proptest::collection::vec((0u64..64, 0u64..64), 0..120)
    ) {
        let mut forest = made_forest();
        for &(a, b) in &edges {
            forest.union(a, b);
        }
        for idx in 0..forest.len() as u64 {
            let root = forest.find(idx);
            prop_assert_eq!(forest.find(root), root);
            prop_assert_eq!(forest.find_const(idx), root);
        }
    }

    #[test]
    fn prop_union_is_order_independent(
        edges in proptest::collection::vec((0u64..64, 0u64..64), 0..120)
    ) {
        let mut forwards = made_forest();
        for &(a, b) in &edges {
            forwards.union(a, b);
        }

        let mut backwards = made_forest();
        for &(a, b) in edges.iter().rev() {
            backwards.union(b, a);
        }

        prop_assert_eq!(canonical_partition(&forwards), canonical_partition(&backwards));

        // Size magnitude and boundary sign are partition properties too
        for idx in 0..forwards.len() as u64 {
            let fwd = forwards.root_size(forwards.find_const(idx));
            let bwd = backwards.root_size(backwards.find_const(idx));
            prop_assert_eq!(fwd, bwd);
        }
    }

    #[test]
    fn prop_root_sign_tracks_boundary_membership(
        edges in proptest::collection::vec((0u64..64, 0u64..64), 0..120)
    ) {
        let mut forest = made_forest();
        for &(a, b) in &edges {
            forest.union(a, b);
        }

        let lat = forest.lattice();
        let mut cardinality = vec![0u32; forest.len()];
        let mut touches = vec![false; forest.len()];
        for idx in 0..forest.len() as u64 {
            let root = forest.find_const(idx) as usize;
            cardinality[root] += 1;
            let (x, y, z) = lat.decode(idx);
            touches[root] |= lat.on_boundary(x, y, z);
        }

        for root in 0..forest.len() as u64 {
            if cardinality[root as usize] == 0 {
                continue;
            }
            let size = forest.root_size(root);
            prop_assert_eq!(size.unsigned_abs(), cardinality[root as usize]);
            prop_assert_eq!(size < 0, touches[root as usize]);
        }
    }

    // =========================================================================
    // sampler.rs: threshold and per-edge determinism
    // =========================================================================

    #[test]
    fn prop_threshold_is_monotone_in_p(p in 0.0f64..=1.0, q in 0.0f64..=1.0) {
        let (lo, hi) = if p <= q { (p, q) } else { (q, p) };
        prop_assert!(open_threshold(lo) <= open_threshold(hi));
    }

    #[test]
    fn prop_indexed_draws_are_pure(seed in any::<u64>(), edge in any::<u64>()) {
        let mut a = IndexedSampler::new(0.4, seed);
        let mut b = IndexedSampler::new(0.4, seed);
        prop_assert_eq!(a.is_open(edge), b.is_open(edge));
        // Repeat draws of the same edge agree with themselves
        prop_assert_eq!(a.is_open(edge), b.is_open(edge));
    }

    // =========================================================================
    // histogram.rs: merge algebra
    // =========================================================================

    #[test]
    fn prop_histogram_merge_commutes(
        xs in proptest::collection::vec((1i32..5000).prop_map(|v| if v % 2 == 0 { v } else { -v }), 0..60),
        ys in proptest::collection::vec((1i32..5000).prop_map(|v| if v % 3 == 0 { v } else { -v }), 0..60)
    ) {
        let mut a = Histogram::new();
        for &v in &xs {
            a.record(v);
        }
        let mut b = Histogram::new();
        for &v in &ys {
            b.record(v);
        }

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);

        prop_assert_eq!(&ab, &ba);
        prop_assert_eq!(ab.total(), (xs.len() + ys.len()) as u64);
    }
}
