//! CSV output for accumulated histograms.
//!
//! One file per `(p, L, C, R)` tuple. The layout is consumed by external
//! analysis tooling and is therefore fixed:
//!
//! ```text
//! probability, central cube size, simulation size, number of simulations
//! 0.2488000000, 32, 512, 20
//!
//! start size,number terminated,number still growing
//! 1, t1, g1
//! 2, t2, g2
//! ...
//! ```
//!
//! "start size" is the bucket index + 1; row k aggregates components with
//! `2^(k-1) <= |size| < 2^k` across all repeats.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use perc_core::{Histogram, SimConfig};

/// File name for one `(p, L, C, R)` tuple.
fn csv_file_name(config: &SimConfig) -> String {
    format!(
        "cubic_bond_percolation_p_{:.10}_centre_{}_size_{}_num_{}.csv",
        config.probability,
        config.central_size,
        config.side(),
        config.repeats
    )
}

fn write_contents<W: Write>(mut out: W, config: &SimConfig, histogram: &Histogram) -> std::io::Result<()> {
    writeln!(
        out,
        "probability, central cube size, simulation size, number of simulations"
    )?;
    writeln!(
        out,
        "{:.10}, {}, {}, {}",
        config.probability,
        config.central_size,
        config.side(),
        config.repeats
    )?;
    writeln!(out)?;
    writeln!(out, "start size,number terminated,number still growing")?;
    for (bucket, counts) in histogram.buckets().iter().enumerate() {
        writeln!(out, "{}, {}, {}", bucket + 1, counts.terminated, counts.growing)?;
    }
    Ok(())
}

/// Writes the accumulated histogram for `config` into `dir`, creating the
/// directory if needed. Returns the path of the written file.
pub fn write_histogram_csv(dir: &Path, config: &SimConfig, histogram: &Histogram) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let path = dir.join(csv_file_name(config));
    let file = File::create(&path)
        .with_context(|| format!("creating result file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_contents(&mut writer, config, histogram)
        .and_then(|()| writer.flush())
        .with_context(|| format!("writing results to {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimConfig {
        SimConfig {
            probability: 0.2488,
            cube_pow: 9,
            threads: 4,
            central_size: 32,
            repeats: 20,
        }
    }

    #[test]
    fn file_name_encodes_the_tuple() {
        assert_eq!(
            csv_file_name(&config()),
            "cubic_bond_percolation_p_0.2488000000_centre_32_size_512_num_20.csv"
        );
    }

    #[test]
    fn contents_follow_the_fixed_layout() {
        let mut histogram = Histogram::new();
        histogram.record(1);
        histogram.record(-1);
        histogram.record(3);

        let mut buf = Vec::new();
        write_contents(&mut buf, &config(), &histogram).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let expected = "\
probability, central cube size, simulation size, number of simulations
0.2488000000, 32, 512, 20

start size,number terminated,number still growing
1, 1, 1
2, 1, 0
";
        assert_eq!(text, expected);
    }
}
