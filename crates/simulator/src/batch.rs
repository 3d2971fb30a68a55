//! Many independent runs over seeded synthetic workloads.
//!
//! Each run owns its own engine, so runs execute in parallel on the rayon
//! pool and the result does not depend on the number of threads.

use crate::workload::SyntheticWorkload;
use rayon::prelude::*;
use serde::Serialize;
use simcfs_core::NullSink;
use simcfs_simulation::{EngineConfig, RunSummary, SimulationError, SimulationRunner};
use tracing::{debug, info};

/// Configuration for a batch of runs.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of runs.
    pub runs: usize,

    /// Seed of the first run; run `i` uses `seed + i`.
    pub seed: u64,

    /// Workload shape. Its own seed is replaced per run.
    pub workload: SyntheticWorkload,

    /// Engine configuration shared by every run.
    pub engine: EngineConfig,
}

impl BatchConfig {
    /// Create a batch of `runs` runs over `workload`.
    pub fn new(runs: usize, workload: SyntheticWorkload) -> Self {
        Self {
            runs,
            seed: workload.seed,
            workload,
            engine: EngineConfig::default(),
        }
    }

    /// Set the seed of the first run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the engine configuration.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

/// Result of one run in a batch.
#[derive(Clone, Debug, Serialize)]
pub struct BatchRun {
    /// Position in the batch.
    pub index: usize,
    /// Workload seed.
    pub seed: u64,
    /// Run summary.
    pub summary: RunSummary,
}

/// Run every workload of the batch, in parallel.
///
/// Results are in run order. The first failing run aborts the batch.
pub fn run_batch(config: &BatchConfig) -> Result<Vec<BatchRun>, SimulationError> {
    info!(runs = config.runs, seed = config.seed, "Starting batch");

    let runs = (0..config.runs)
        .into_par_iter()
        .map(|index| -> Result<BatchRun, SimulationError> {
            let seed = config.seed.wrapping_add(index as u64);
            let tasks = config.workload.clone().with_seed(seed).generate();
            let outcome =
                SimulationRunner::new(config.engine.clone(), tasks)?.run(&mut NullSink)?;
            debug!(index, seed, makespan = outcome.makespan(), "Batch run finished");
            Ok(BatchRun {
                index,
                seed,
                summary: outcome.summary,
            })
        })
        .collect::<Result<Vec<_>, SimulationError>>()?;

    info!(runs = runs.len(), "Batch finished");
    Ok(runs)
}

/// Means over a batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchTotals {
    /// Number of runs.
    pub runs: usize,
    /// Mean makespan.
    pub makespan: f64,
    /// Mean of per-run average turnaround.
    pub turnaround: f64,
    /// Mean of per-run average waiting time.
    pub waiting: f64,
    /// Mean of per-run average response time.
    pub response: f64,
    /// Mean CPU utilization.
    pub cpu_utilization: f64,
}

impl BatchTotals {
    /// Average the summaries of `runs`.
    pub fn from_runs(runs: &[BatchRun]) -> Self {
        if runs.is_empty() {
            return Self::default();
        }
        let n = runs.len() as f64;
        let mean = |f: fn(&RunSummary) -> f64| runs.iter().map(|r| f(&r.summary)).sum::<f64>() / n;
        Self {
            runs: runs.len(),
            makespan: mean(|s| s.makespan),
            turnaround: mean(|s| s.avg_turnaround),
            waiting: mean(|s| s.avg_waiting),
            response: mean(|s| s.avg_response),
            cpu_utilization: mean(|s| s.cpu_utilization),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn batch(runs: usize) -> BatchConfig {
        BatchConfig::new(runs, SyntheticWorkload::new(6).with_max_arrival(10.0)).with_seed(100)
    }

    #[traced_test]
    #[test]
    fn test_runs_in_order_with_consecutive_seeds() {
        let runs = run_batch(&batch(8)).unwrap();
        assert_eq!(runs.len(), 8);
        for (i, run) in runs.iter().enumerate() {
            assert_eq!(run.index, i);
            assert_eq!(run.seed, 100 + i as u64);
            assert_eq!(run.summary.tasks, 6);
        }
        assert!(logs_contain("Batch finished"));
    }

    #[test]
    fn test_batch_is_deterministic() {
        let a = run_batch(&batch(4)).unwrap();
        let b = run_batch(&batch(4)).unwrap();
        let makespans = |runs: &[BatchRun]| runs.iter().map(|r| r.summary.makespan).collect::<Vec<_>>();
        assert_eq!(makespans(&a), makespans(&b));
    }

    #[test]
    fn test_failing_run_fails_batch() {
        let config = batch(3).with_engine(EngineConfig::default().with_max_events(1));
        assert!(matches!(
            run_batch(&config),
            Err(SimulationError::EventBudgetExhausted { .. })
        ));
    }

    #[test]
    fn test_totals() {
        let runs = run_batch(&batch(5)).unwrap();
        let totals = BatchTotals::from_runs(&runs);
        assert_eq!(totals.runs, 5);
        assert!(totals.cpu_utilization > 0.0 && totals.cpu_utilization <= 1.0 + 1e-9);
        assert_eq!(BatchTotals::from_runs(&[]), BatchTotals::default());
    }
}
