//! Deterministic scheduler simulation runner.
//!
//! This crate drives a single simulated CPU through a fixed set of tasks.
//! Given the same input and configuration, it produces an identical event
//! trace every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SimulationRunner                       │
//! │                                                         │
//! │  pending (by arrival)   blocked (by return time)        │
//! │        │                        │          current      │
//! │        ▼                        ▼            │          │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  next decision point = min(arrival, io return,     │ │
//! │  │                           cpu stop)                │ │
//! │  │  same instant: ARRIVAL → IO_RETURN → CPU_STOP      │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  ReadyQueue.pick_next → FairnessCalculator slice   │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           ▼                             │
//! │                  EventSink (log, chart, ...)            │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod metrics;
mod queues;
mod runner;
mod validate;

pub use config::EngineConfig;
pub use error::{InvariantViolation, SimulationError, ValidationError};
pub use metrics::{RunSummary, SimulationOutcome, TaskMetrics};
pub use runner::{SimulationRunner, SimulationStats};
pub use validate::validate_tasks;
