use anyhow::Context;
use clap::{Parser, Subcommand};
use queen_race::{
    AggregatedView, ColorAssignment, PoolConfig, RenderSink, RunController, RunSummary,
    WorkerOutcome,
};
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "qrace")]
#[command(about = "qrace - concurrent anchored N-queens search")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one worker per starting row and report how each search ended
    Run {
        /// Board size N
        #[arg(long, short = 'n', default_value = "8", allow_negative_numbers = true)]
        size: i64,
        /// Number of workers (defaults to one per row)
        #[arg(long, short = 'j')]
        workers: Option<usize>,
        /// Pause between search steps in milliseconds
        #[arg(long, default_value = "100")]
        delay_ms: u64,
        /// Snapshot channel capacity (defaults to the worker count)
        #[arg(long)]
        capacity: Option<usize>,
        /// Cancel the run after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Print each worker's final board
        #[arg(long)]
        boards: bool,
        /// Enable verbose output
        #[arg(long, short)]
        verbose: bool,
    },
    /// Print the color assigned to each worker
    Colors {
        /// Number of workers
        #[arg(long, short = 'j', default_value = "8")]
        workers: usize,
    },
}

// --- Console Sink ---

/// Prints a line the first time each worker's latest snapshot is terminal.
#[derive(Default)]
struct ConsoleSink {
    reported: Mutex<BTreeSet<usize>>,
}

impl RenderSink for ConsoleSink {
    fn update(&self, view: AggregatedView) {
        let Ok(mut reported) = self.reported.lock() else {
            return;
        };
        for (&id, snapshot) in &view.states {
            if snapshot.phase().is_terminal() && reported.insert(id) {
                let color = view.colors.get(id).map(|c| c.to_hex()).unwrap_or_default();
                println!(
                    "worker {:>3} {} {:<10} after {:>6} steps ({:.2?})",
                    id,
                    color,
                    snapshot.phase(),
                    snapshot.step(),
                    snapshot.elapsed()
                );
            }
        }
    }
}

// --- Reporting ---

fn print_summary(summary: &RunSummary, boards: bool) {
    println!("\nRun Statistics:");
    println!("  Snapshots aggregated: {}", summary.received);
    if summary.timed_out {
        println!("  Timed out: remaining workers were cancelled");
    }
    println!(
        "  {:>6} {:>6} {:>10} {:>8} {:>10} {:>8}",
        "worker", "anchor", "outcome", "steps", "published", "dropped"
    );
    for w in &summary.workers {
        println!(
            "  {:>6} {:>6} {:>10} {:>8} {:>10} {:>8}",
            w.worker_id,
            w.anchor_row,
            w.outcome.to_string(),
            w.steps,
            w.published,
            w.dropped
        );
    }

    let solved = summary
        .workers
        .iter()
        .filter(|w| w.outcome == WorkerOutcome::Solved)
        .count();
    println!("  Solutions: {}/{}", solved, summary.workers.len());

    if boards {
        for (id, snapshot) in &summary.view.states {
            println!("\nWorker {} ({}):", id, snapshot.phase());
            print!("{}", snapshot.board());
        }
    }
}

fn print_colors(colors: &ColorAssignment) {
    for (id, color) in colors.iter() {
        println!("worker {:>3}: {} (r={}, g={}, b={})", id, color, color.r, color.g, color.b);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

// --- Main Function ---
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Run {
            size,
            workers,
            delay_ms,
            capacity,
            timeout,
            boards,
            verbose,
        } => {
            init_logging(verbose);

            let config = PoolConfig::default()
                .with_step_delay(Duration::from_millis(delay_ms))
                .with_channel_capacity_option(capacity)
                .with_workers_option(workers);
            debug!(?config, size, "starting");

            let mut controller = RunController::new(config, ConsoleSink::default());
            let colors = controller
                .start_run(size)
                .context("failed to start run")?;
            println!("Running {} workers on a {}x{} board", colors.len(), size, size);

            let summary = controller
                .finish_run(timeout.map(Duration::from_secs))
                .unwrap_or_default();
            print_summary(&summary, boards);
        }
        Commands::Colors { workers } => {
            print_colors(&ColorAssignment::new(workers));
        }
    }

    Ok(())
}
