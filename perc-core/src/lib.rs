//! # perc-core: Parallel Union-Find Clustering for Cubic Bond Percolation
//!
//! `perc-core` implements the clustering engine behind a Monte Carlo estimator
//! of the bond-percolation threshold on the three-dimensional cubic lattice.
//! For an edge probability `p` and a cube of side `L = 2^b`, it:
//!
//! 1. **Generates a random edge configuration** - each of the ~3L³ lattice
//!    edges is open independently with probability `p`
//! 2. **Tracks connected clusters** - a memory-compact disjoint set forest
//!    merges sites as open edges are drawn
//! 3. **Tabulates the size distribution** - a log₂-bucketed histogram over a
//!    centred sub-volume, separating clusters that terminated inside the box
//!    from those still touching its outer face
//!
//! ## Architecture
//!
//! The forest stores one packed 12-byte record per site (8-byte parent link,
//! 4-byte signed size) so that L = 1024 fits in ~12 GB. The sign of a root's
//! size doubles as the "touches the outer boundary" flag, propagated through
//! unions. Key design points:
//!
//! - **Path halving** in `find` for O(α(n)) amortized complexity
//! - **Divide-and-conquer generation** - disjoint x-slabs are built
//!   concurrently without locks, then stitched by single-threaded seam passes
//! - **Lock-free histogramming** - per-worker histograms merged pointwise
//!
//! ## Quick Start
//!
//! ```ignore
//! use perc_core::{Forest, Lattice, StreamSampler};
//!
//! let lattice = Lattice::new(6); // 64³ sites
//! let mut forest = Forest::new(lattice)?;
//!
//! // Generate one configuration on 4 threads
//! forest.generate_parallel(4, || StreamSampler::from_entropy(0.2488))?;
//!
//! // Size distribution of the central 32³ window
//! let hist = forest.central_histogram(32, 4)?;
//! for (bucket, counts) in hist.buckets().iter().enumerate() {
//!     println!("2^{bucket}: {} terminated, {} growing", counts.terminated, counts.growing);
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`lattice`] - coordinate ↔ linear index codec and boundary tests
//! - [`forest`] - packed node storage and memory sizing
//! - [`dsu`] - make_set / find / union with the boundary sign bit
//! - [`sampler`] - Bernoulli edge sampling against `⌊2⁶⁴·p⌋`
//! - [`generate`] - slab generator, seam merger, parallel orchestrator
//! - [`histogram`] - central-volume size-distribution histogram
//! - [`enumerate`] - root → member-list extraction for presentation code
//! - [`config`] - validated simulation parameters

#![deny(missing_docs)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Validated simulation parameters.
pub mod config;

/// Disjoint set forest operations (make_set, find, union).
pub mod dsu;

/// Cluster enumeration for presentation code.
pub mod enumerate;

/// Library error taxonomy.
pub mod error;

/// Packed node storage for the disjoint set forest.
pub mod forest;

/// Slab generation, seam merging, and the parallel orchestrator.
pub mod generate;

/// Size-distribution histogram over the central sub-volume.
pub mod histogram;

/// Cubic lattice index codec.
pub mod lattice;

/// Bernoulli edge samplers.
pub mod sampler;

// =============================================================================
// Convenience Re-exports (Clean Public API)
// =============================================================================

pub use config::SimConfig;
pub use error::Error;
pub use forest::{forest_bytes, Forest, Node};
pub use histogram::{BucketCount, Histogram};
pub use lattice::Lattice;
pub use sampler::{EdgeSampler, IndexedSampler, StreamSampler};
