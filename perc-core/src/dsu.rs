//! Disjoint set forest operations.
//!
//! The operations come in two flavours:
//!
//! - unsynchronized implementations on the crate-private shared view, used
//!   by the generation workers (each confined to its own x-slab, see
//!   [`forest`](crate::forest));
//! - safe wrappers on [`Forest`] taking `&mut self`/`&self`, used by
//!   sequential callers and tests.
//!
//! `find` applies **path halving**: each step points the current node at its
//! grandparent and advances. It mutates at most one pointer per step and is
//! branch-light, which is why it is preferred over full two-pass
//! compression here. During the read-only phases (histogram, enumeration)
//! [`Forest::find_const`] must be used instead; it performs no writes at
//! all, so any number of threads may share the forest.
//!
//! # The Boundary Sign Bit
//!
//! `union` merges by `|size|` and re-signs the surviving root:
//! `new_size = (|a| + |b|) · sign`, negative iff either input root was
//! negative. Once a component has absorbed a boundary site it stays
//! negative through every later union, so "touches the outer face" is an
//! O(1) query on any root.

use crate::forest::{Forest, Node, SharedNodes};

impl SharedNodes<'_> {
    /// Turns `idx` into a singleton component.
    ///
    /// Size is +1 for an interior site, −1 for a site on the outer face.
    ///
    /// # Safety
    ///
    /// `idx < len`, exclusive access to `idx` (slab confinement), and the
    /// site must not have been made before. The last point is checked in
    /// debug builds via the unused marker.
    #[inline(always)]
    pub(crate) unsafe fn make_set(&self, idx: u64, boundary: bool) {
        debug_assert!(self.size(idx) == 0, "make_set called twice on a site");
        self.set_parent(idx, idx);
        self.set_size(idx, if boundary { -1 } else { 1 });
    }

    /// Finds the root of `idx`, halving the path as it walks.
    ///
    /// # Safety
    ///
    /// `idx < len` and the whole component containing `idx` must be
    /// exclusively owned by the calling worker (path halving writes parent
    /// links along the walk).
    #[inline(always)]
    pub(crate) unsafe fn find(&self, idx: u64) -> u64 {
        let p = self.parent(idx);
        if p == idx {
            return idx; // Fast path: singletons dominate at sub-critical p
        }
        self.find_slow(idx, p)
    }

    // Cold path: walk with path halving until a self-parented node appears.
    #[inline(never)]
    #[cold]
    unsafe fn find_slow(&self, mut idx: u64, mut p: u64) -> u64 {
        loop {
            let grandparent = self.parent(p);
            if p == grandparent {
                return p;
            }
            // Point idx at its grandparent, then advance to it.
            self.set_parent(idx, grandparent);
            idx = grandparent;
            p = self.parent(idx);
        }
    }

    /// Merges the components of `a` and `b`; no-op if already joined.
    ///
    /// Union by size: the root with smaller `|size|` is reparented under the
    /// larger. On a tie the first argument's root is reparented. The
    /// surviving root's size becomes `(|a| + |b|)`, negated iff either root
    /// was negative.
    ///
    /// # Safety
    ///
    /// `a, b < len`; both components exclusively owned by the caller; both
    /// sites already `make_set`.
    pub(crate) unsafe fn union(&self, a: u64, b: u64) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }

        let size_a = self.size(root_a);
        let size_b = self.size(root_b);
        debug_assert!(size_a != 0 && size_b != 0, "union on a site before make_set");

        let (child, parent) = if size_a.unsigned_abs() <= size_b.unsigned_abs() {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };

        let merged = size_a.unsigned_abs() + size_b.unsigned_abs();
        debug_assert!(merged <= i32::MAX as u32);
        let new_size = if size_a < 0 || size_b < 0 {
            -(merged as i32)
        } else {
            merged as i32
        };

        self.set_parent(child, parent);
        self.set_size(parent, new_size);
    }
}

impl Forest {
    /// Turns `idx` into a singleton component, sized ±1 by boundary membership.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range. Calling it twice on a site is a
    /// precondition violation, caught in debug builds.
    pub fn make_set(&mut self, idx: u64) {
        assert!((idx as usize) < self.len());
        let (x, y, z) = self.lattice().decode(idx);
        let boundary = self.lattice().on_boundary(x, y, z);
        let shared = self.shared();
        // SAFETY: idx is in range and `&mut self` guarantees exclusivity.
        unsafe { shared.make_set(idx, boundary) }
    }

    /// Finds the root of `idx` with path halving.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn find(&mut self, idx: u64) -> u64 {
        assert!((idx as usize) < self.len());
        let shared = self.shared();
        // SAFETY: idx is in range and `&mut self` guarantees exclusivity.
        unsafe { shared.find(idx) }
    }

    /// Finds the root of `idx` without mutating the forest.
    ///
    /// This is the only find permitted during the read-only phases; it can
    /// be called from any number of threads sharing `&Forest`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[must_use]
    pub fn find_const(&self, idx: u64) -> u64 {
        find_const_in(self.nodes(), idx)
    }

    /// Merges the components of `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn union(&mut self, a: u64, b: u64) {
        assert!((a as usize) < self.len() && (b as usize) < self.len());
        let shared = self.shared();
        // SAFETY: indices are in range and `&mut self` guarantees exclusivity.
        unsafe { shared.union(a, b) }
    }

    /// Signed size of the component rooted at `root`.
    ///
    /// Meaningful only when `root` is actually a root; for non-roots the
    /// field is unspecified.
    #[must_use]
    pub fn root_size(&self, root: u64) -> i32 {
        self.node(root).size
    }
}

/// Read-only root walk over a plain node slice.
#[inline]
fn find_const_in(nodes: &[Node], idx: u64) -> u64 {
    let mut current = idx;
    loop {
        let parent = nodes[current as usize].parent;
        if parent == current {
            return current;
        }
        current = parent;
    }
}
