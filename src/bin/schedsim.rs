//! schedsim — Run CPU scheduling simulations from JSON workload files.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sched_sim::{run_all, run_policy, PolicyKind, SimConfig, SimFormat, Workload};

/// Run CPU scheduling simulations from JSON workload files.
#[derive(Parser)]
#[command(name = "schedsim")]
struct Cli {
    /// Path to a JSON workload file.
    workload: PathBuf,

    /// Policy to simulate: fcfs, sjf, priority, rr, psjf, ppriority (or 1-6).
    ///
    /// When omitted, every policy runs on the same workload and the reports
    /// are printed one after another.
    #[arg(short, long)]
    policy: Option<PolicyKind>,

    /// Round Robin time slice in ticks (overrides the workload file).
    #[arg(long, value_name = "TICKS")]
    time_slice: Option<u64>,

    /// I/O block length in ticks (overrides the workload file).
    #[arg(long, value_name = "TICKS")]
    io_duration: Option<u64>,

    /// Maximum number of processes accepted from the workload.
    #[arg(long, value_name = "N")]
    max_processes: Option<usize>,

    /// Abort a run that has not finished by this tick.
    #[arg(long, value_name = "TICKS", env = "SCHEDSIM_MAX_TICKS")]
    max_ticks: Option<u64>,

    /// Emit reports as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Print a per-tick timeline after each report.
    #[arg(long)]
    timeline: bool,

    /// Print trace events to stderr.
    #[arg(long)]
    dump_trace: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut SimConfig) {
        if let Some(v) = self.time_slice {
            config.time_slice = v;
        }
        if let Some(v) = self.io_duration {
            config.io_duration = v;
        }
        if let Some(v) = self.max_processes {
            config.max_processes = v;
        }
        if let Some(v) = self.max_ticks {
            config.max_ticks = (v > 0).then_some(v);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let json = std::fs::read_to_string(&cli.workload)
        .with_context(|| format!("failed to read {}", cli.workload.display()))?;

    let workload = Workload::parse(&json).context("failed to load workload")?;
    let base = SimConfig::from_env().context("bad SCHEDSIM_* environment")?;

    // CLI flags take precedence over the workload file's global section.
    let mut config = workload.config(base);
    cli.apply_overrides(&mut config);
    let scenario = workload
        .into_scenario(config)
        .context("failed to load workload")?;

    let results = match cli.policy {
        Some(kind) => vec![run_policy(kind, &scenario)?],
        None => run_all(&scenario)?,
    };

    let mut out = std::io::stdout().lock();
    if cli.json {
        let reports: Vec<_> = results.iter().map(|r| &r.report).collect();
        serde_json::to_writer_pretty(&mut out, &reports)?;
        writeln!(out)?;
    } else {
        for result in &results {
            write!(out, "{}", result.report)?;
            if cli.timeline {
                writeln!(out, "Timeline: {}", result.trace.timeline())?;
            }
            writeln!(out)?;
        }
    }

    if cli.dump_trace {
        for result in &results {
            eprintln!("--- {} ---", result.report.scheduler);
            result.trace.dump();
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .event_format(SimFormat)
        .try_init();
}
