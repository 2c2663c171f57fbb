//! Command-line entry point for the corridor crossing simulation.
//!
//! Exit status: 0 after a clean timed run; 2 when a monitor alarm or a
//! one-way pile-up aborts the run; 1 on primitive failure.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crossvisor::{LogWriter, SimConfig, Subscribe, Supervisor};

/// Bounded-capacity corridor crossing simulation.
#[derive(Parser, Debug)]
#[command(name = "crossvisor", version, about)]
struct Args {
    /// Print the per-actor action trace to stdout.
    #[arg(short, long)]
    debug: bool,

    /// Number of crosser actors.
    #[arg(long)]
    crossers: Option<usize>,

    /// Number of monitor actors.
    #[arg(long)]
    monitors: Option<usize>,

    /// Corridor capacity (occupancy slots).
    #[arg(long)]
    capacity: Option<usize>,

    /// Crossing sum above which a monitor aborts the run.
    #[arg(long)]
    threshold: Option<u32>,

    /// Total run duration in seconds.
    #[arg(long)]
    run_for: Option<u64>,

    /// Enforce strict unidirectional traffic.
    #[arg(long)]
    one_way: bool,
}

impl Args {
    fn into_config(self) -> (SimConfig, bool) {
        let mut cfg = SimConfig::default();
        if let Some(n) = self.crossers {
            cfg.crossers = n;
        }
        if let Some(n) = self.monitors {
            cfg.monitors = n;
        }
        if let Some(n) = self.capacity {
            cfg.capacity = n;
            cfg.threshold = n as u32;
        }
        if let Some(n) = self.threshold {
            cfg.threshold = n;
        }
        if let Some(secs) = self.run_for {
            cfg.run_for = Duration::from_secs(secs);
        }
        cfg.one_way = self.one_way;
        (cfg, self.debug)
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let (cfg, debug) = Args::parse().into_config();

    let subscribers: Vec<Arc<dyn Subscribe>> = if debug {
        vec![Arc::new(LogWriter)]
    } else {
        Vec::new()
    };

    let supervisor = Supervisor::new(cfg, subscribers);
    match supervisor.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
