//! # Offrect Command Line
//!
//! Hosted front end: reads a polygon (one `x,y` point per line, closed by
//! a lone integer or end of file), runs the control core against a worker
//! pool of the chosen size and prints the throughput line and the best
//! area.
//!
//! ```text
//! $ printf '0,0\n0,10\n5,10\n5,5\n10,5\n10,0\n0\n' | offrect --workers 4
//! thread 1 finish at 1.234M cycles and n/a instructions
//! best area: 66
//! ```
//!
//! Diagnostics go to stderr through `tracing` (`RUST_LOG`, default `info`).

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use offrect::boundary::Boundary;
use offrect::diag::{Console, NullConsole, StdConsole};
use offrect::ingest::read_boundary;
use offrect::kernel::{self, SearchReport};
use offrect::stats::HostClock;

/// Worker pool sizes the binary is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PoolSize {
    #[value(name = "1")]
    One,
    #[value(name = "4")]
    Four,
    #[value(name = "16")]
    Sixteen,
    #[value(name = "64")]
    SixtyFour,
}

/// How the worker pool is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExecutorKind {
    /// One OS thread per worker slot
    Threaded,
    /// Workers stepped by the control thread between polls
    Inline,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Largest empty rectangle search over a control/worker offload pool"
)]
struct Args {
    /// Polygon file, one `x,y` point per line. Reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Number of worker slots per batch
    #[arg(short, long, value_enum, default_value_t = PoolSize::SixtyFour)]
    workers: PoolSize,
    /// Worker pool execution model
    #[arg(short, long, value_enum, default_value_t = ExecutorKind::Threaded)]
    executor: ExecutorKind,
    /// Suppress progress lines; only the final best area is printed
    #[arg(short, long)]
    quiet: bool,
}

fn search<const N: usize, C: Console>(
    boundary: &Boundary,
    executor: ExecutorKind,
    console: C,
) -> offrect::error::Result<SearchReport> {
    let clock = HostClock::new();
    match executor {
        ExecutorKind::Threaded => kernel::search_threaded::<N, _, _>(boundary, console, clock),
        ExecutorKind::Inline => kernel::search_inline::<N, _, _>(boundary, console, clock),
    }
}

fn run<C: Console>(args: &Args, mut console: C) -> Result<SearchReport> {
    let boundary = match &args.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_boundary(BufReader::new(file), &mut console)
        }
        None => read_boundary(io::stdin().lock(), &mut console),
    }
    .context("reading polygon")?;

    let report = match args.workers {
        PoolSize::One => search::<1, _>(&boundary, args.executor, console),
        PoolSize::Four => search::<4, _>(&boundary, args.executor, console),
        PoolSize::Sixteen => search::<16, _>(&boundary, args.executor, console),
        PoolSize::SixtyFour => search::<64, _>(&boundary, args.executor, console),
    }
    .context("searching polygon")?;
    Ok(report)
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    info!(workers = ?args.workers, executor = ?args.executor, "offrect starting");

    if args.quiet {
        let report = run(&args, NullConsole)?;
        println!("best area: {}", report.best_area());
    } else {
        run(&args, StdConsole::new())?;
    }
    Ok(())
}
