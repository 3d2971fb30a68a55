//! Machine-readable run reports.

use hdrhistogram::Histogram;
use serde::Serialize;
use simcfs_fair::SchedulerConfig;
use simcfs_simulation::{RunSummary, SimulationOutcome, TaskMetrics};
use simcfs_types::SimTime;
use thiserror::Error;

/// Histogram resolution: samples are recorded in thousandths of a time unit.
const SCALE: f64 = 1000.0;

/// Errors building or exporting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The latency histogram could not be created.
    #[error("histogram creation failed: {0}")]
    Histogram(#[from] hdrhistogram::CreationError),

    /// A sample could not be recorded.
    #[error("histogram record failed: {0}")]
    Record(#[from] hdrhistogram::RecordError),

    /// Serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Distribution of one per-task timing metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencyStats {
    /// Number of samples.
    pub count: u64,
    /// Arithmetic mean.
    pub mean: SimTime,
    /// Median.
    pub p50: SimTime,
    /// 90th percentile.
    pub p90: SimTime,
    /// 99th percentile.
    pub p99: SimTime,
    /// Largest sample.
    pub max: SimTime,
}

impl LatencyStats {
    /// Summarise non-negative samples.
    ///
    /// The histogram grows to fit the largest sample.
    pub fn from_samples(samples: impl IntoIterator<Item = SimTime>) -> Result<Self, ReportError> {
        let mut hist = Histogram::<u64>::new(3)?;
        for sample in samples {
            hist.record((sample.max(0.0) * SCALE).round() as u64)?;
        }
        if hist.is_empty() {
            return Ok(Self::default());
        }

        let at = |q: f64| hist.value_at_quantile(q) as f64 / SCALE;
        Ok(Self {
            count: hist.len(),
            mean: hist.mean() / SCALE,
            p50: at(0.50),
            p90: at(0.90),
            p99: at(0.99),
            max: hist.max() as f64 / SCALE,
        })
    }
}

/// Everything known about a finished run, ready for export.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Where the workload came from (file name, seed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Tunables the run used.
    pub scheduler: SchedulerConfig,
    /// Aggregate summary.
    pub summary: RunSummary,
    /// Response time distribution.
    pub response: LatencyStats,
    /// Turnaround time distribution.
    pub turnaround: LatencyStats,
    /// Waiting time distribution.
    pub waiting: LatencyStats,
    /// Per-task metrics, in input order.
    pub tasks: Vec<TaskMetrics>,
}

impl SimulationReport {
    /// Build a report from a finished run.
    pub fn new(scheduler: SchedulerConfig, outcome: &SimulationOutcome) -> Result<Self, ReportError> {
        let metrics = &outcome.metrics;
        Ok(Self {
            source: None,
            scheduler,
            summary: outcome.summary.clone(),
            response: LatencyStats::from_samples(metrics.iter().map(|m| m.response))?,
            turnaround: LatencyStats::from_samples(metrics.iter().map(|m| m.turnaround))?,
            waiting: LatencyStats::from_samples(metrics.iter().map(|m| m.waiting))?,
            tasks: metrics.clone(),
        })
    }

    /// Label the workload source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
