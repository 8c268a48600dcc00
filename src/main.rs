//! `srpairs` CLI - inspect and export super-resolution training pairs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use srpairs::image::{save_tensor, Precision, RangeNorm, TensorFormat};
use srpairs::{Config, ScanOrder, SrDataset, TargetSize};

/// Generate low/high resolution training pairs from a directory of images.
#[derive(Parser, Debug)]
#[command(name = "srpairs")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sample count and the shapes of one pair.
    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        /// Sample to generate.
        #[arg(short, long, default_value = "0", value_name = "INT")]
        index: usize,

        /// Map samples to [-1, 1] instead of [0, 1].
        #[arg(long)]
        signed: bool,

        /// Produce half-precision tensors.
        #[arg(long)]
        half: bool,
    },

    /// Write each pair as `NNNNNN_lr.png` and `NNNNNN_hr.png`.
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory, created if missing.
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Export at most this many samples.
        #[arg(short, long, value_name = "INT")]
        limit: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Directory of source images.
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// High-resolution size, `N` or `HxW`.
    #[arg(short, long, default_value = "256", value_name = "SIZE", value_parser = parse_size)]
    size: TargetSize,

    /// Downscale factor between high and low resolution.
    #[arg(short, long, default_value = "4", value_name = "INT")]
    factor: u32,

    /// Keep directory listing order instead of sorting paths.
    #[arg(long)]
    unsorted: bool,
}

impl SourceArgs {
    fn open(&self, format: TensorFormat) -> Result<SrDataset> {
        let config = Config {
            format,
            ..Config::new(self.size, self.factor)
        };
        let order = if self.unsorted {
            ScanOrder::Filesystem
        } else {
            ScanOrder::Sorted
        };

        SrDataset::open_with_order(&self.dir, config, order)
            .with_context(|| format!("Failed to open dataset at {}", self.dir.display()))
    }
}

fn parse_size(s: &str) -> std::result::Result<TargetSize, String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid size component {v:?}: {e}"))
    };

    match s.split_once(['x', 'X']) {
        Some((h, w)) => Ok(TargetSize::new(parse(h)?, parse(w)?)),
        None => parse(s).map(TargetSize::square),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("srpairs={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&cli) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Inspect {
            source,
            index,
            signed,
            half,
        } => {
            let format = TensorFormat {
                range: if *signed {
                    RangeNorm::MinusOneToOne
                } else {
                    RangeNorm::ZeroToOne
                },
                precision: if *half { Precision::Half } else { Precision::Full },
            };
            inspect(&source.open(format)?, *index)
        }
        Command::Export {
            source,
            output,
            limit,
        } => export(&source.open(TensorFormat::UNIT_FULL)?, output, *limit),
    }
}

fn inspect(dataset: &SrDataset, index: usize) -> Result<()> {
    println!("samples: {}", dataset.len());

    let path = dataset.path(index)?;
    let pair = dataset
        .get(index)
        .with_context(|| format!("Failed to generate sample {index}"))?;

    println!("sample {index}: {}", path.display());
    for (name, tensor) in [("lr", &pair.lr), ("hr", &pair.hr)] {
        let (lo, hi) = tensor.value_range().unwrap_or((0.0, 0.0));
        println!(
            "  {name}: shape {:?}, {:?}, range [{lo:.4}, {hi:.4}]",
            tensor.shape(),
            tensor.precision()
        );
    }

    Ok(())
}

fn export(dataset: &SrDataset, output: &Path, limit: Option<usize>) -> Result<()> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let count = limit.map_or(dataset.len(), |n| n.min(dataset.len()));
    tracing::info!("Exporting {count} of {} samples to {}", dataset.len(), output.display());

    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Exporting [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let failed = AtomicUsize::new(0);
    (0..count).into_par_iter().for_each(|i| {
        if let Err(err) = export_one(dataset, output, i) {
            tracing::warn!("sample {i}: {err:#}");
            failed.fetch_add(1, Ordering::Relaxed);
        }
        pb.inc(1);
    });
    pb.finish_with_message("Export complete");

    let failed = failed.into_inner();
    tracing::info!("Exported {} pairs, {failed} failed", count - failed);

    Ok(())
}

fn export_one(dataset: &SrDataset, output: &Path, index: usize) -> Result<()> {
    let pair = dataset.get(index)?;
    let range = dataset.pipeline().config().format.range;

    save_tensor(&pair.lr, range, output.join(format!("{index:06}_lr.png")))?;
    save_tensor(&pair.hr, range, output.join(format!("{index:06}_hr.png")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_square() {
        assert_eq!(parse_size("128").unwrap(), TargetSize::square(128));
    }

    #[test]
    fn test_parse_size_pair() {
        assert_eq!(parse_size("96x64").unwrap(), TargetSize::new(96, 64));
        assert_eq!(parse_size("96X64").unwrap(), TargetSize::new(96, 64));
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("big").is_err());
        assert!(parse_size("10x").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["srpairs", "export", "in", "out", "-s", "64x32", "-f", "2"]).unwrap();
        match cli.command {
            Command::Export { source, output, limit } => {
                assert_eq!(source.size, TargetSize::new(64, 32));
                assert_eq!(source.factor, 2);
                assert_eq!(output, PathBuf::from("out"));
                assert_eq!(limit, None);
            }
            Command::Inspect { .. } => panic!("expected export"),
        }
    }
}
