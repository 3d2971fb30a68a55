//! simcfs simulator
//!
//! Everything around the engine needed to run experiments from the command
//! line: reading task files, generating synthetic workloads, rendering the
//! event log, Gantt chart and summary, and exporting reports.
//!
//! # Architecture
//!
//! ```text
//! task file ──► parser ──┐
//!                        ├──► SimulationRunner ──► EventSink ──► TextLog / GanttChart
//! SyntheticWorkload ─────┘           │
//!                                    └──► SimulationOutcome ──► render_summary
//!                                                           └──► SimulationReport (JSON)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use simcfs_simulator::{parse_task_file, GanttChart, TextLog};
//! use simcfs_simulation::{EngineConfig, SimulationRunner};
//!
//! let tasks = parse_task_file("A 0 0 10\nB 0 0 10\n")?;
//! let mut sinks = (TextLog::new(std::io::stdout()), GanttChart::new());
//! let outcome = SimulationRunner::new(EngineConfig::default(), tasks)?.run(&mut sinks)?;
//! print!("{}", sinks.1.render());
//! ```

pub mod batch;
pub mod config;
pub mod output;
pub mod parser;
pub mod report;
pub mod workload;

pub use batch::{run_batch, BatchConfig, BatchRun, BatchTotals};
pub use config::{ConfigFileError, RunSection, SimulatorConfig};
pub use output::{render_summary, GanttChart, TextLog};
pub use parser::{format_task_file, parse_task_file, ParseError};
pub use report::{LatencyStats, ReportError, SimulationReport};
pub use workload::{SyntheticWorkload, WorkloadGenerator};
