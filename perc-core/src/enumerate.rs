//! Cluster enumeration for presentation code.
//!
//! Walks the forest once and groups sites under their root, skipping
//! components below a caller-chosen size. Strictly a convenience for
//! plotting front-ends; nothing on the hot path uses it, and it only ever
//! reads the forest (non-mutating find), so it can run while other readers
//! share the structure.

use rustc_hash::FxHashMap;

use crate::forest::Forest;

impl Forest {
    /// Groups sites by component root, keeping components with
    /// `|size| >= min_size`.
    ///
    /// Keys are root indices; values are member coordinates in index order.
    #[must_use]
    pub fn clusters(&self, min_size: u32) -> FxHashMap<u64, Vec<(u32, u32, u32)>> {
        let lattice = self.lattice();
        let mut clusters: FxHashMap<u64, Vec<(u32, u32, u32)>> = FxHashMap::default();

        for idx in 0..self.len() as u64 {
            let root = self.find_const(idx);
            if self.root_size(root).unsigned_abs() >= min_size {
                clusters.entry(root).or_default().push(lattice.decode(idx));
            }
        }

        clusters
    }

    /// True iff the component of `root` still touches the outer face.
    ///
    /// Presentation helper: lets callers label enumerated clusters
    /// "terminated" or "still growing" without reading sign conventions.
    #[must_use]
    pub fn is_growing(&self, root: u64) -> bool {
        self.root_size(root) < 0
    }
}
