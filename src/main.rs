//! Finance Splat - command line front end
//!
//! Loads a financial data file, builds the normalized point dataset and
//! optionally exports it.

use anyhow::{Context, Result};
use clap::Parser;
use finance_splat::data::{DataLoader, DataProcessor};
use finance_splat::export::{self, DatasetReport};
use finance_splat::stats::StatsCalculator;
use finance_splat::SplatConfig;
use log::{debug, info};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "finance-splat", version, about)]
struct Args {
    /// Data file in the `NUMBER_POINTS` column-block format
    input: PathBuf,

    /// JSON config with column selection and late threshold
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column mapped to the x axis
    #[arg(long)]
    x: Option<String>,

    #[arg(long)]
    y: Option<String>,

    #[arg(long)]
    z: Option<String>,

    /// Column used as the per-point scalar
    #[arg(long)]
    scalar: Option<String>,

    /// Normalized scalar above which a record counts as late
    #[arg(long)]
    late_threshold: Option<f64>,

    /// Write normalized points to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON summary report to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<SplatConfig> {
    let mut config = match &args.config {
        Some(path) => SplatConfig::from_file(path)?,
        None => SplatConfig::default(),
    };

    let columns = &mut config.columns;
    for (flag, target) in [
        (&args.x, &mut columns.x),
        (&args.y, &mut columns.y),
        (&args.z, &mut columns.z),
        (&args.scalar, &mut columns.scalar),
    ] {
        if let Some(name) = flag {
            *target = name.clone();
        }
    }
    if let Some(threshold) = args.late_threshold {
        config.late_threshold = threshold;
    }

    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let mut loader = DataLoader::new();
    let table = loader
        .load_file(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    if log::log_enabled!(log::Level::Debug) {
        for stats in StatsCalculator::compute_table_stats_parallel(table) {
            debug!(
                "{}: n={} min={} max={} mean={:.4} std={:.4}",
                stats.column_name, stats.count, stats.min, stats.max, stats.mean, stats.std
            );
        }
    }

    let dataset = DataProcessor::build_dataset(table, &config.columns)
        .context("Failed to build point dataset")?;
    let late = dataset.filter_by_scalar(config.late_threshold);

    info!(
        "{} points (x={}, y={}, z={}, scalar={}); {} above {}",
        dataset.len(),
        config.columns.x,
        config.columns.y,
        config.columns.z,
        config.columns.scalar,
        late.len(),
        config.late_threshold
    );
    if let Some((lo, hi)) = dataset.bounds() {
        info!("Bounds {:?} - {:?}", lo, hi);
    }

    if let Some(path) = &args.csv {
        export::write_csv(&dataset, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote points to {}", path.display());
    }

    if let Some(path) = &args.report {
        let report = DatasetReport::new(&args.input, table, &dataset, config.late_threshold);
        export::write_report(&report, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote report to {}", path.display());
    }

    Ok(())
}
