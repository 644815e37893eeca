//! Validated simulation parameters.

use crate::error::Error;
use crate::lattice::Lattice;

/// Largest supported cube exponent.
///
/// The component size lives in a signed 32-bit field, so a single cluster
/// may not exceed `i32::MAX` sites; `L = 2^10` (2³⁰ sites) is the largest
/// cube that keeps even the fully-connected configuration representable.
pub const MAX_CUBE_POW: u32 = 10;

/// Parameters of one simulation run.
///
/// Construct it literally, then call [`validate`](Self::validate) before
/// doing any work; every field is checked per the error taxonomy, and all
/// failures are reported before a forest is allocated.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    /// Edge-activation probability, in `[0, 1]`.
    pub probability: f64,
    /// Cube exponent `b`; the simulation box has side `L = 2^b`.
    pub cube_pow: u32,
    /// Worker count for generation and histogramming; a power of two ≥ 2.
    pub threads: usize,
    /// Side of the centred sub-cube the histogram is taken over; ≤ L.
    pub central_size: u32,
    /// Number of repeated configurations accumulated into one histogram.
    pub repeats: u32,
}

impl SimConfig {
    /// The cube side `L`.
    #[must_use]
    pub const fn side(&self) -> u32 {
        1 << self.cube_pow
    }

    /// The lattice codec for this configuration.
    #[must_use]
    pub const fn lattice(&self) -> Lattice {
        Lattice::new(self.cube_pow)
    }

    /// Checks every parameter, reporting the first violation.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.probability.is_finite() || !(0.0..=1.0).contains(&self.probability) {
            return Err(Error::Config(format!(
                "probability must lie in [0, 1], got {}",
                self.probability
            )));
        }
        if self.cube_pow == 0 || self.cube_pow > MAX_CUBE_POW {
            return Err(Error::Config(format!(
                "cube exponent must lie in [1, {}], got {}",
                MAX_CUBE_POW, self.cube_pow
            )));
        }
        if !self.threads.is_power_of_two() || self.threads < 2 {
            return Err(Error::Config(format!(
                "thread count must be a power of two >= 2, got {}",
                self.threads
            )));
        }
        if self.threads > self.side() as usize {
            return Err(Error::Config(format!(
                "thread count {} exceeds cube side {}",
                self.threads,
                self.side()
            )));
        }
        if self.central_size == 0 || self.central_size > self.side() {
            return Err(Error::Config(format!(
                "central cube side must lie in [1, {}], got {}",
                self.side(),
                self.central_size
            )));
        }
        if self.repeats == 0 {
            return Err(Error::Config("repeat count must be >= 1".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SimConfig {
        SimConfig {
            probability: 0.2488,
            cube_pow: 6,
            threads: 4,
            central_size: 32,
            repeats: 20,
        }
    }

    #[test]
    fn accepts_sane_config() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn rejects_probability_outside_unit_interval() {
        for p in [-0.1, 1.1, f64::NAN, f64::INFINITY] {
            let cfg = SimConfig {
                probability: p,
                ..base()
            };
            assert!(cfg.validate().is_err(), "p = {p} should be rejected");
        }
    }

    #[test]
    fn rejects_oversized_cube() {
        let cfg = SimConfig {
            cube_pow: MAX_CUBE_POW + 1,
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_bad_thread_counts() {
        for threads in [0, 1, 3, 6, 100] {
            let cfg = SimConfig { threads, ..base() };
            assert!(cfg.validate().is_err(), "threads = {threads}");
        }
        // More workers than x-planes cannot be assigned disjoint slabs
        let cfg = SimConfig {
            cube_pow: 2,
            threads: 8,
            central_size: 4,
            ..base()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_central_cube_larger_than_simulation() {
        let cfg = SimConfig {
            central_size: 128,
            cube_pow: 6,
            ..base()
        };
        assert!(cfg.validate().is_err());
    }
}
