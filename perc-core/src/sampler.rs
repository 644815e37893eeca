//! Bernoulli edge samplers.
//!
//! Every lattice edge is open independently with probability `p`. Rather
//! than drawing floats, samplers compare a uniform 64-bit draw against the
//! precomputed integer threshold `T = ⌊2⁶⁴·p⌋`, so the hot loop is one RNG
//! step and one compare.
//!
//! Two implementations sit behind the [`EdgeSampler`] seam:
//!
//! - [`StreamSampler`] - the production path. One xoshiro256++ stream per
//!   worker, seeded from OS entropy (or a fixed seed for reproducing a
//!   single-threaded run). Draw order depends on the worker layout, so
//!   parallel runs only match sequential ones *in distribution*.
//! - [`IndexedSampler`] - a stateless per-edge draw keyed on the edge id.
//!   The outcome of an edge is a pure function of `(seed, edge_id)`, which
//!   makes sequential and parallel generation produce the identical
//!   configuration. Used by the consistency tests and `--seed` runs.

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Integer threshold `⌊2⁶⁴·p⌋`, saturating at the representable maximum.
///
/// `p = 0` yields 0 (no draw is ever below it); `p = 1` saturates to
/// `u64::MAX`, leaving a single unreachable-in-practice 2⁻⁶⁴ miss per edge.
#[inline]
#[must_use]
pub fn open_threshold(p: f64) -> u64 {
    // `as` saturates: p = 1.0 maps to u64::MAX rather than wrapping.
    (p * 18_446_744_073_709_551_616.0) as u64
}

/// Decides whether an edge of the configuration is open.
///
/// The generation code draws exactly once per edge position it visits,
/// unconditionally, passing the edge's stable id. Stream-based samplers may
/// ignore the id; indexed samplers key on it.
pub trait EdgeSampler {
    /// One Bernoulli(p) draw for the edge identified by `edge_id`.
    fn is_open(&mut self, edge_id: u64) -> bool;
}

/// Sequential xoshiro256++ stream compared against `⌊2⁶⁴·p⌋`.
pub struct StreamSampler {
    rng: Xoshiro256PlusPlus,
    threshold: u64,
}

impl StreamSampler {
    /// A sampler seeded from the operating system entropy source.
    ///
    /// This is the per-worker contract of the parallel orchestrator: every
    /// worker owns an independently seeded stream.
    #[must_use]
    pub fn from_entropy(p: f64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
            threshold: open_threshold(p),
        }
    }

    /// A sampler with a fixed seed, for reproducible sequential runs.
    #[must_use]
    pub fn seeded(p: f64, seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            threshold: open_threshold(p),
        }
    }
}

impl EdgeSampler for StreamSampler {
    #[inline(always)]
    fn is_open(&mut self, _edge_id: u64) -> bool {
        self.rng.next_u64() < self.threshold
    }
}

/// Stateless per-edge sampler: the draw is a hash of `(seed, edge_id)`.
///
/// Because the outcome does not depend on visit order, a clamped slab draw
/// and the seam pass over the same physical edge agree, and any worker
/// layout yields the same configuration as the sequential walk.
#[derive(Clone, Copy)]
pub struct IndexedSampler {
    seed: u64,
    threshold: u64,
}

impl IndexedSampler {
    /// A per-edge sampler for probability `p` and the given seed.
    #[must_use]
    pub fn new(p: f64, seed: u64) -> Self {
        Self {
            seed,
            threshold: open_threshold(p),
        }
    }
}

impl EdgeSampler for IndexedSampler {
    #[inline(always)]
    fn is_open(&mut self, edge_id: u64) -> bool {
        splitmix64(self.seed ^ edge_id.wrapping_mul(0x9E37_79B9_7F4A_7C15)) < self.threshold
    }
}

// SplitMix64 finalizer; full 64-bit avalanche, so consecutive edge ids give
// decorrelated draws.
#[inline(always)]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
