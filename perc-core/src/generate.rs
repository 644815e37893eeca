//! Configuration generation: slab walks, seam merges, and the parallel
//! divide-and-conquer orchestrator.
//!
//! # Raster Order With "Previous" Neighbours
//!
//! A slab walk visits every site of its x-range in lexicographic order
//! (x outer, then y, then z) and considers only the three edges back to
//! already-visited neighbours: −z, −y, −x. Every undirected lattice edge is
//! therefore sampled exactly once, and both endpoints of a merge always
//! exist. Out-of-range neighbour coordinates are clamped (z and y to 0, x to
//! the slab's lower bound), producing a degenerate self-edge that `union`
//! treats as a no-op; the real −x edge at a slab boundary is deferred to the
//! seam pass.
//!
//! The three draws per site happen unconditionally, one per neighbour
//! position, so a fixed seed reproduces the configuration of a sequential
//! run draw-for-draw.
//!
//! # Parallel Structure
//!
//! `generate_parallel` bisects `[0, L)` like a merge sort: recurse into both
//! halves concurrently, join, then run the seam pass over the shared face at
//! the midpoint. A seam at `x = m` thus runs only after both adjacent
//! subtrees are fully generated and internally seamed, which is what makes
//! the unsynchronized node writes sound (see [`forest`](crate::forest)).

use rayon::ThreadPoolBuilder;

use crate::error::Error;
use crate::forest::{Forest, SharedNodes};
use crate::lattice::{Lattice, AXIS_X, AXIS_Y, AXIS_Z};
use crate::sampler::EdgeSampler;

impl Forest {
    /// Generates the whole configuration sequentially.
    ///
    /// Equivalent to a single slab covering `[0, L)`. With a fixed-seed
    /// sampler this is the reference configuration the deterministic
    /// parallel mode reproduces.
    pub fn generate<S: EdgeSampler>(&mut self, sampler: &mut S) {
        let side = self.lattice().side();
        self.generate_range(0, side, sampler);
    }

    /// Generates the self-contained slab `x ∈ [x0, x1)`.
    ///
    /// Merges only involve sites within the slab; the −x edges of the
    /// `x0` plane are left for [`merge_seam`](Self::merge_seam). Exposed so
    /// that callers (and tests) can compose slabs and seams explicitly.
    ///
    /// # Panics
    ///
    /// Panics unless `x0 < x1 <= L`.
    pub fn generate_range<S: EdgeSampler>(&mut self, x0: u32, x1: u32, sampler: &mut S) {
        let lattice = self.lattice();
        assert!(x0 < x1 && x1 <= lattice.side(), "invalid slab range");
        let shared = self.shared();
        // SAFETY: `&mut self` gives this call exclusive access to every node.
        unsafe { generate_slab(&shared, lattice, x0, x1, sampler) }
    }

    /// Samples the cross-slab edges of the plane `x = at`, merging
    /// `(at−1, j, k)` with `(at, j, k)` wherever the edge comes up open.
    ///
    /// Both adjacent slabs must already be generated.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= at < L`.
    pub fn merge_seam<S: EdgeSampler>(&mut self, at: u32, sampler: &mut S) {
        let lattice = self.lattice();
        assert!(at >= 1 && at < lattice.side(), "seam plane out of range");
        let shared = self.shared();
        // SAFETY: `&mut self` gives this call exclusive access to every node.
        unsafe { merge_seam_plane(&shared, lattice, at, sampler) }
    }

    /// Generates the configuration on `threads` workers.
    ///
    /// `[0, L)` is bisected until each leaf slab has length `L / threads`;
    /// leaves run concurrently, and every bisection merges its midpoint seam
    /// after both children have joined. `make_sampler` is invoked once per
    /// leaf slab and once per seam, so each worker owns its RNG stream.
    ///
    /// # Errors
    ///
    /// `threads` must be a power of two in `[2, L]`; pool construction
    /// failure is reported as [`Error::Parallelism`].
    pub fn generate_parallel<S, F>(&mut self, threads: usize, make_sampler: F) -> Result<(), Error>
    where
        S: EdgeSampler,
        F: Fn() -> S + Sync,
    {
        let lattice = self.lattice();
        let side = lattice.side();
        if !threads.is_power_of_two() || threads < 2 || threads > side as usize {
            return Err(Error::Config(format!(
                "parallel generation needs a power-of-two thread count in [2, {}], got {}",
                side, threads
            )));
        }
        let leaf_len = side / threads as u32;

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("perc-gen-{i}"))
            .build()
            .map_err(|e| Error::Parallelism(e.to_string()))?;

        let shared = self.shared();
        pool.install(|| {
            // SAFETY: the bisection assigns disjoint half-open x-ranges to
            // concurrent workers, and seams run after both children join;
            // see the SharedNodes safety argument.
            unsafe { build_range(&shared, lattice, 0, side, leaf_len, &make_sampler) }
        });
        Ok(())
    }
}

// Recursive bisection: generate both halves concurrently, then stitch the
// midpoint seam. Identical in structure to a merge sort.
unsafe fn build_range<S, F>(
    nodes: &SharedNodes<'_>,
    lattice: Lattice,
    x0: u32,
    x1: u32,
    leaf_len: u32,
    make_sampler: &F,
) where
    S: EdgeSampler,
    F: Fn() -> S + Sync,
{
    if x1 - x0 <= leaf_len {
        let mut sampler = make_sampler();
        generate_slab(nodes, lattice, x0, x1, &mut sampler);
        return;
    }

    let mid = (x0 + x1) / 2;
    rayon::join(
        // SAFETY: the two closures own disjoint x-ranges.
        || unsafe { build_range(nodes, lattice, x0, mid, leaf_len, make_sampler) },
        || unsafe { build_range(nodes, lattice, mid, x1, leaf_len, make_sampler) },
    );

    // Both children (and their interior seams) are done; the two slabs are
    // quiescent for the duration of this seam.
    let mut sampler = make_sampler();
    merge_seam_plane(nodes, lattice, mid, &mut sampler);
}

// SAFETY contract for both walkers: exclusive access to every node whose
// x-coordinate lies in the ranges they touch.
unsafe fn generate_slab<S: EdgeSampler>(
    nodes: &SharedNodes<'_>,
    lattice: Lattice,
    x0: u32,
    x1: u32,
    sampler: &mut S,
) {
    let side = lattice.side();
    for x in x0..x1 {
        // Clamp −x into the slab: the x0 plane gets a degenerate self-edge
        // and its real −x edges are sampled by the seam pass instead.
        let px = if x > x0 { x - 1 } else { x0 };
        for y in 0..side {
            let py = y.saturating_sub(1);
            for z in 0..side {
                let idx = lattice.encode(x, y, z);
                nodes.make_set(idx, lattice.on_boundary(x, y, z));

                // One unconditional draw per neighbour position, −z then −y
                // then −x, neighbour passed first.
                if sampler.is_open(lattice.edge_id(idx, AXIS_Z)) {
                    nodes.union(lattice.encode(x, y, z.saturating_sub(1)), idx);
                }
                if sampler.is_open(lattice.edge_id(idx, AXIS_Y)) {
                    nodes.union(lattice.encode(x, py, z), idx);
                }
                if sampler.is_open(lattice.edge_id(idx, AXIS_X)) {
                    nodes.union(lattice.encode(px, y, z), idx);
                }
            }
        }
    }
}

unsafe fn merge_seam_plane<S: EdgeSampler>(
    nodes: &SharedNodes<'_>,
    lattice: Lattice,
    at: u32,
    sampler: &mut S,
) {
    let side = lattice.side();
    for y in 0..side {
        for z in 0..side {
            let here = lattice.encode(at, y, z);
            // The −x edge of `here`: same id the slab walk clamped over.
            if sampler.is_open(lattice.edge_id(here, AXIS_X)) {
                nodes.union(lattice.encode(at - 1, y, z), here);
            }
        }
    }
}
