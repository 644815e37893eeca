//! Size-distribution histogram over the central sub-volume.
//!
//! Buckets are powers of two: bucket `k` aggregates sites whose component
//! size satisfies `2^k <= |size| < 2^(k+1)`. Smaller log bases would give
//! more data points but non-integer bucket boundaries, so base 2 it is.
//! Each bucket keeps two counts:
//!
//! - **terminated** - the component lies entirely inside the box
//!   (`size > 0`); its size is measured correctly;
//! - **growing** - the component touches the outer face (`size < 0`) and
//!   would extend further on an infinite lattice.
//!
//! The terminated/growing split over a window far from the boundary is the
//! observable the threshold estimate is built on.

use rayon::ThreadPoolBuilder;

use crate::error::Error;
use crate::forest::Forest;

/// Per-bucket pair of cluster-size counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BucketCount {
    /// Sites whose component terminated inside the box.
    pub terminated: u64,
    /// Sites whose component still touches the outer face.
    pub growing: u64,
}

/// Log₂-bucketed size distribution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Histogram {
    buckets: Vec<BucketCount>,
}

impl Histogram {
    /// An empty histogram.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one site belonging to a component of the given signed size.
    ///
    /// # Panics
    ///
    /// Panics on size 0, which only occurs if the forest was never
    /// generated.
    #[inline]
    pub fn record(&mut self, size: i32) {
        let magnitude = size.unsigned_abs();
        let bucket = magnitude.ilog2() as usize;
        if self.buckets.len() <= bucket {
            self.buckets.resize(bucket + 1, BucketCount::default());
        }
        if size > 0 {
            self.buckets[bucket].terminated += 1;
        } else {
            self.buckets[bucket].growing += 1;
        }
    }

    /// Adds `other` into `self` pointwise.
    pub fn merge(&mut self, other: &Histogram) {
        if self.buckets.len() < other.buckets.len() {
            self.buckets.resize(other.buckets.len(), BucketCount::default());
        }
        for (acc, b) in self.buckets.iter_mut().zip(&other.buckets) {
            acc.terminated += b.terminated;
            acc.growing += b.growing;
        }
    }

    /// The buckets, lowest power of two first.
    #[must_use]
    pub fn buckets(&self) -> &[BucketCount] {
        &self.buckets
    }

    /// Total number of recorded sites across all buckets.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.buckets
            .iter()
            .map(|b| b.terminated + b.growing)
            .sum()
    }
}

impl Forest {
    /// Size histogram of the centred `central³` window, on `threads` workers.
    ///
    /// Walks every site of the window, resolves its root with the
    /// non-mutating find, and buckets by the root's size. The x-range is
    /// bisected recursively; each worker accumulates a private histogram and
    /// the results are merged pointwise on the way back up, so the pass is
    /// lock-free.
    ///
    /// # Errors
    ///
    /// `central` must lie in `[1, L]` and `threads` must be non-zero.
    pub fn central_histogram(&self, central: u32, threads: usize) -> Result<Histogram, Error> {
        let side = self.lattice().side();
        if central == 0 || central > side {
            return Err(Error::Config(format!(
                "central cube side must lie in [1, {}], got {}",
                side, central
            )));
        }
        if threads == 0 {
            return Err(Error::Config("histogram needs at least one worker".to_owned()));
        }

        let lo = (side - central) / 2;
        let hi = lo + central;
        let leaf_len = (central / threads as u32).max(1);

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("perc-hist-{i}"))
            .build()
            .map_err(|e| Error::Parallelism(e.to_string()))?;
        Ok(pool.install(|| count_range(self, lo, hi, lo, hi, leaf_len)))
    }
}

fn count_range(forest: &Forest, x0: u32, x1: u32, win_lo: u32, win_hi: u32, leaf_len: u32) -> Histogram {
    if x1 - x0 <= leaf_len {
        let lattice = forest.lattice();
        let mut hist = Histogram::new();
        for x in x0..x1 {
            for y in win_lo..win_hi {
                for z in win_lo..win_hi {
                    let root = forest.find_const(lattice.encode(x, y, z));
                    hist.record(forest.root_size(root));
                }
            }
        }
        return hist;
    }

    let mid = (x0 + x1) / 2;
    let (mut left, right) = rayon::join(
        || count_range(forest, x0, mid, win_lo, win_hi, leaf_len),
        || count_range(forest, mid, x1, win_lo, win_hi, leaf_len),
    );
    left.merge(&right);
    left
}
