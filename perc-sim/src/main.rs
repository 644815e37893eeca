//! Monte Carlo driver for cubic bond percolation threshold studies.
//!
//! Sweeps one or more edge probabilities near the critical point, runs
//! repeated simulations per point, and writes one CSV of the accumulated
//! central-volume size histogram per point.
//!
//! # Usage
//!
//! ```bash
//! # 20 simulations of a 512³ cube at a single probability
//! cargo run --release -p perc-sim -- --probability 0.2488 --cube-pow 9
//!
//! # Five-point sweep stepping by 1e-5, deterministic seeding
//! cargo run --release -p perc-sim -- \
//!     --probability 0.24878 --prob-step 0.00001 --prob-count 5 --seed 42
//! ```

mod output;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use perc_core::{Forest, Histogram, IndexedSampler, SimConfig, StreamSampler};

#[derive(Parser, Debug)]
#[command(name = "perc-sim")]
#[command(about = "Monte Carlo estimator for the cubic bond percolation threshold")]
struct Args {
    /// First edge probability of the sweep
    #[arg(long)]
    probability: f64,

    /// Increment between sweep points
    #[arg(long, default_value_t = 0.0)]
    prob_step: f64,

    /// Number of sweep points
    #[arg(long, default_value_t = 1)]
    prob_count: usize,

    /// Cube exponent b; the simulation box has side L = 2^b
    #[arg(long, default_value_t = 9)]
    cube_pow: u32,

    /// Worker threads (power of two >= 2)
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Side of the centred sub-cube the histogram is taken over
    #[arg(long, default_value_t = 32)]
    central: u32,

    /// Simulations accumulated per sweep point
    #[arg(long, default_value_t = 20)]
    repeats: u32,

    /// Directory the CSV files are written to
    #[arg(long, default_value = "data")]
    output_dir: PathBuf,

    /// Deterministic per-edge seeding (omit to seed from OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Suppress per-simulation progress lines
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    for point in 0..args.prob_count {
        let probability = args.probability + point as f64 * args.prob_step;
        let config = SimConfig {
            probability,
            cube_pow: args.cube_pow,
            threads: args.threads,
            central_size: args.central,
            repeats: args.repeats,
        };
        config.validate()?;

        run_point(&args, &config, point as u64)
            .with_context(|| format!("sweep point {} (p = {:.10})", point, probability))?;
    }

    Ok(())
}

fn run_point(args: &Args, config: &SimConfig, point: u64) -> Result<()> {
    println!(
        "Running {} simulations with size {} for p = {:.10}",
        config.repeats,
        config.side(),
        config.probability
    );

    let mut accumulated = Histogram::new();
    for sim in 0..config.repeats {
        let started = Instant::now();

        let mut forest = Forest::new(config.lattice())?;
        match args.seed {
            Some(seed) => {
                // Every (point, repeat) pair gets its own edge-sampling seed
                let run_seed = seed ^ (point << 32 | sim as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                forest.generate_parallel(config.threads, || {
                    IndexedSampler::new(config.probability, run_seed)
                })?;
            }
            None => {
                forest.generate_parallel(config.threads, || {
                    StreamSampler::from_entropy(config.probability)
                })?;
            }
        }

        let histogram = forest.central_histogram(config.central_size, config.threads)?;
        accumulated.merge(&histogram);

        if !args.quiet {
            println!(
                "  simulation {}/{} finished in {} ms",
                sim + 1,
                config.repeats,
                started.elapsed().as_millis()
            );
        }
    }

    let path = output::write_histogram_csv(&args.output_dir, config, &accumulated)?;
    println!(
        "Completed {} simulations with size {} for p = {:.10} -> {}",
        config.repeats,
        config.side(),
        config.probability,
        path.display()
    );
    Ok(())
}
