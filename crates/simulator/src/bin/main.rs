//! simcfs CLI
//!
//! Runs the fair-share scheduler simulation over a task file, generates
//! synthetic task files, and runs seeded batches.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simcfs_core::TracingSink;
use simcfs_simulation::SimulationRunner;
use simcfs_simulator::{
    format_task_file, parse_task_file, render_summary, run_batch, BatchConfig, BatchTotals,
    GanttChart, SimulationReport, SimulatorConfig, SyntheticWorkload, TextLog,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simcfs")]
#[command(about = "Discrete-event simulator for a fair-share CPU scheduler")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Scheduler and limit overrides shared by `run` and `batch`.
#[derive(clap::Args)]
struct Tunables {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scheduling period
    #[arg(long)]
    period: Option<f64>,

    /// Minimum granularity
    #[arg(long)]
    granularity: Option<f64>,

    /// Abort after this many decision points
    #[arg(long)]
    max_events: Option<u64>,

    /// Wall-clock budget per run (e.g., "500ms", "5s")
    #[arg(long)]
    budget: Option<humantime::Duration>,
}

impl Tunables {
    fn resolve(&self) -> Result<SimulatorConfig> {
        let mut config = match &self.config {
            Some(path) => SimulatorConfig::load(path)?,
            None => SimulatorConfig::default(),
        };
        if let Some(period) = self.period {
            config = config.with_scheduling_period(period);
        }
        if let Some(granularity) = self.granularity {
            config = config.with_min_granularity(granularity);
        }
        if let Some(max_events) = self.max_events {
            config = config.with_max_events(max_events);
        }
        if let Some(budget) = &self.budget {
            config = config.with_budget(**budget);
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a task file
    Run {
        /// Task file: `<id> <arrival> <nice> <cpu> [<io> <cpu> ...]` per line
        file: PathBuf,

        #[command(flatten)]
        tunables: Tunables,

        /// Write output to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a JSON report instead of the summary table
        #[arg(long)]
        json: bool,

        /// Skip the Gantt chart
        #[arg(long)]
        no_gantt: bool,

        /// Skip the event log
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print a synthetic task file
    Generate {
        /// Number of tasks
        #[arg(long, default_value = "8")]
        tasks: usize,

        /// Random seed
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Latest arrival time
        #[arg(long, default_value = "20")]
        max_arrival: f64,

        /// Maximum CPU bursts per task
        #[arg(long, default_value = "3")]
        max_bursts: usize,

        /// Lowest nice value
        #[arg(long, default_value = "-20", allow_hyphen_values = true)]
        nice_min: i32,

        /// Highest nice value
        #[arg(long, default_value = "19", allow_hyphen_values = true)]
        nice_max: i32,
    },

    /// Simulate many seeded synthetic workloads in parallel
    Batch {
        /// Number of runs
        #[arg(long, default_value = "16")]
        runs: usize,

        /// Seed of the first run
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Tasks per run
        #[arg(long, default_value = "8")]
        tasks: usize,

        #[command(flatten)]
        tunables: Tunables,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn run(
    file: &Path,
    tunables: &Tunables,
    output: Option<&Path>,
    json: bool,
    no_gantt: bool,
    quiet: bool,
) -> Result<()> {
    let config = tunables.resolve()?;
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let tasks = parse_task_file(&text).with_context(|| format!("in {}", file.display()))?;
    let runner = SimulationRunner::new(config.engine_config()?, tasks)?;

    let mut out = open_output(output)?;
    let mut gantt = GanttChart::new();
    let outcome = {
        let log_out: Box<dyn Write + '_> = if quiet || json {
            Box::new(io::sink())
        } else {
            Box::new(&mut out)
        };
        let mut log = TextLog::new(log_out);
        let outcome = runner.run(&mut (&mut log, (&mut gantt, TracingSink)))?;
        log.finish().context("failed to write event log")?;
        outcome
    };

    if json {
        let report = SimulationReport::new(config.scheduler.clone(), &outcome)?
            .with_source(file.display().to_string());
        writeln!(out, "{}", report.to_json()?)?;
    } else {
        if !no_gantt {
            write!(out, "\n{}", gantt.render())?;
        }
        write!(out, "\n{}", render_summary(&outcome))?;
    }
    out.flush()?;
    Ok(())
}

fn batch(runs: usize, seed: u64, tasks: usize, tunables: &Tunables, json: bool) -> Result<()> {
    let config = tunables.resolve()?;
    let batch = BatchConfig::new(runs, SyntheticWorkload::new(tasks))
        .with_seed(seed)
        .with_engine(config.engine_config()?);
    let results = run_batch(&batch)?;
    let totals = BatchTotals::from_runs(&results);

    if json {
        let value = serde_json::json!({ "runs": results, "totals": totals });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for r in &results {
        println!(
            "run {:>4}  seed {:<12} makespan {:>9.2}  turnaround {:>8.2}  waiting {:>8.2}  cpu {:>6.2}%",
            r.index,
            r.seed,
            r.summary.makespan,
            r.summary.avg_turnaround,
            r.summary.avg_waiting,
            r.summary.cpu_utilization * 100.0
        );
    }
    println!(
        "mean over {} run(s): makespan {:.2}, turnaround {:.2}, waiting {:.2}, response {:.2}, cpu {:.2}%",
        totals.runs,
        totals.makespan,
        totals.turnaround,
        totals.waiting,
        totals.response,
        totals.cpu_utilization * 100.0
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            tunables,
            output,
            json,
            no_gantt,
            quiet,
        } => {
            init_tracing();
            run(&file, &tunables, output.as_deref(), json, no_gantt, quiet)?;
        }

        Commands::Generate {
            tasks,
            seed,
            max_arrival,
            max_bursts,
            nice_min,
            nice_max,
        } => {
            // No tracing for generate: output goes to stdout
            let workload = SyntheticWorkload::new(tasks)
                .with_seed(seed)
                .with_max_arrival(max_arrival)
                .with_max_cpu_bursts(max_bursts)
                .with_nice_range(nice_min..=nice_max);
            print!("{}", format_task_file(&workload.generate()));
        }

        Commands::Batch {
            runs,
            seed,
            tasks,
            tunables,
            json,
        } => {
            init_tracing();
            batch(runs, seed, tasks, &tunables, json)?;
        }
    }

    Ok(())
}
