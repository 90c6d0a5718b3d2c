//! Loop-order benchmark runner.
//!
//! Prints one CSV row per (order, size) to stdout, or to `--csv`. Trend
//! equations go to `--trends` as Markdown, or to the log.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use looporder::logging::{self, LogConfig};
use looporder::report::{write_csv, write_summary, write_trends_markdown};
use looporder::{Aggregation, FillPolicy, LoopOrder, Repeats, SweepConfig, fit_trends, run_sweep};

#[derive(Debug, Parser)]
#[command(name = "looporder", version, about = "Time the six loop orders of a naive matrix multiply")]
struct Cli {
    /// Matrix sizes, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [128usize, 256, 384, 512, 640])]
    sizes: Vec<usize>,

    /// Timed runs per order: one value for every size, or one per size
    #[arg(long, value_delimiter = ',', default_values_t = [3usize])]
    repeats: Vec<usize>,

    /// How repeated timings are combined
    #[arg(long, value_enum, default_value_t = AggregateArg::Median)]
    aggregate: AggregateArg,

    /// How the input matrices are filled
    #[arg(long, value_enum, default_value_t = FillArg::Formula)]
    fill: FillArg,

    /// Seed for --fill random; omitted means a fresh seed from the OS
    #[arg(long)]
    seed: Option<u64>,

    /// Loop orders to time, e.g. ijk,kij (default: all six)
    #[arg(long, value_delimiter = ',')]
    orders: Vec<LoopOrder>,

    /// Write the CSV here instead of stdout
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the trend equations here as Markdown
    #[arg(long)]
    trends: Option<PathBuf>,

    /// Skip the cubic trend fits
    #[arg(long)]
    no_fit: bool,

    /// Print a per-size summary table to stderr
    #[arg(long)]
    summary: bool,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Less log output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    quiet: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AggregateArg {
    Median,
    Mean,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FillArg {
    Formula,
    Random,
}

impl Cli {
    fn sweep_config(&self) -> SweepConfig {
        let mut orders = Vec::new();
        for &o in &self.orders {
            if !orders.contains(&o) {
                orders.push(o);
            }
        }
        if orders.is_empty() {
            orders = LoopOrder::ALL.to_vec();
        }

        SweepConfig {
            sizes: self.sizes.clone(),
            repeats: Repeats::from(self.repeats.clone()),
            aggregation: match self.aggregate {
                AggregateArg::Median => Aggregation::Median,
                AggregateArg::Mean => Aggregation::Mean,
            },
            fill: match self.fill {
                FillArg::Formula => FillPolicy::Formula,
                FillArg::Random => FillPolicy::Uniform { seed: self.seed },
            },
            orders,
        }
    }

    fn verbosity(&self) -> i8 {
        let v = i16::from(self.verbose) - i16::from(self.quiet);
        v.clamp(i16::from(i8::MIN), i16::from(i8::MAX)) as i8
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&LogConfig::from_env(cli.verbosity()))?;

    let config = cli.sweep_config();
    config.validate().context("invalid benchmark configuration")?;
    tracing::info!(
        sizes = ?config.sizes,
        repeats = ?config.repeats,
        aggregation = %config.aggregation,
        fill = ?config.fill,
        "starting sweep"
    );

    let result = run_sweep(&config).context("benchmark sweep failed")?;

    match &cli.csv {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_csv(&mut out, &result.samples)?;
            out.flush()?;
            tracing::info!(path = %path.display(), "wrote csv");
        }
        None => {
            let mut out = io::stdout().lock();
            write_csv(&mut out, &result.samples)?;
            out.flush()?;
        }
    }

    if cli.summary {
        write_summary(&mut io::stderr().lock(), &result)?;
    }

    if cli.no_fit {
        return Ok(());
    }

    let trends = fit_trends(&result.samples);
    match &cli.trends {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_trends_markdown(&mut out, &trends)?;
            out.flush()?;
            tracing::info!(path = %path.display(), "wrote trend equations");
        }
        None => {
            for t in &trends {
                if t.fit.singular {
                    tracing::warn!(series = %t.series, "not enough distinct sizes for a cubic trend");
                } else {
                    tracing::info!(
                        series = %t.series,
                        r2 = t.fit.r_squared,
                        "{}",
                        t.fit.poly
                    );
                }
            }
        }
    }

    Ok(())
}
