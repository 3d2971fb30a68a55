//! End-of-run per-task metrics and aggregate summary.

use crate::SimulationStats;
use serde::Serialize;
use simcfs_types::{Nice, SimTime, Task, TaskId};

/// Timing facts for one finished task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskMetrics {
    /// Task identifier.
    pub id: TaskId,
    /// Static priority.
    pub nice: Nice,
    /// Arrival time.
    pub arrival: SimTime,
    /// First dispatch, if the task ever ran.
    pub start: Option<SimTime>,
    /// Completion time.
    pub end: SimTime,
    /// First dispatch minus arrival. Zero for tasks that never ran.
    pub response: SimTime,
    /// Completion minus arrival.
    pub turnaround: SimTime,
    /// Turnaround minus total CPU and I/O demand, floored at zero.
    pub waiting: SimTime,
    /// Sum of CPU burst durations.
    pub cpu_demand: SimTime,
    /// Sum of I/O burst durations.
    pub io_demand: SimTime,
    /// CPU time actually consumed.
    pub cpu_consumed: SimTime,
    /// Virtual runtime at completion.
    pub final_vruntime: f64,
}

impl TaskMetrics {
    /// Compute metrics for a finished task. Returns `None` if the task has
    /// no completion time.
    pub fn from_task(task: &Task) -> Option<Self> {
        let end = task.end_time()?;
        let arrival = task.arrival_time();
        let cpu_demand = task.cpu_demand();
        let io_demand = task.io_demand();
        let turnaround = end - arrival;
        let response = task.start_time().unwrap_or(arrival) - arrival;
        let waiting = (turnaround - (cpu_demand + io_demand)).max(0.0);

        Some(Self {
            id: task.id().clone(),
            nice: task.nice(),
            arrival,
            start: task.start_time(),
            end,
            response,
            turnaround,
            waiting,
            cpu_demand,
            io_demand,
            cpu_consumed: task.cumulative_exec_time(),
            final_vruntime: task.vruntime(),
        })
    }
}

/// Aggregate statistics over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of tasks.
    pub tasks: usize,
    /// Time from run start (t = 0) to the last completion.
    pub makespan: SimTime,
    /// CPU time consumed by all tasks.
    pub total_cpu: SimTime,
    /// `total_cpu / makespan`, in `[0, 1]`. Zero for an empty makespan.
    pub cpu_utilization: f64,
    /// Mean turnaround time.
    pub avg_turnaround: SimTime,
    /// Mean waiting time.
    pub avg_waiting: SimTime,
    /// Mean response time.
    pub avg_response: SimTime,
    /// Engine counters.
    pub stats: SimulationStats,
}

impl RunSummary {
    /// Summarise per-task metrics.
    pub fn from_metrics(metrics: &[TaskMetrics], stats: SimulationStats) -> Self {
        if metrics.is_empty() {
            return Self {
                stats,
                ..Default::default()
            };
        }

        let n = metrics.len() as f64;
        let makespan = metrics.iter().map(|m| m.end).fold(0.0, f64::max);
        let total_cpu: SimTime = metrics.iter().map(|m| m.cpu_consumed).sum();
        let cpu_utilization = if makespan > 0.0 {
            total_cpu / makespan
        } else {
            0.0
        };

        Self {
            tasks: metrics.len(),
            makespan,
            total_cpu,
            cpu_utilization,
            avg_turnaround: metrics.iter().map(|m| m.turnaround).sum::<f64>() / n,
            avg_waiting: metrics.iter().map(|m| m.waiting).sum::<f64>() / n,
            avg_response: metrics.iter().map(|m| m.response).sum::<f64>() / n,
            stats,
        }
    }
}

/// Result of a completed simulation run.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// Finished tasks, in input order.
    pub tasks: Vec<Task>,
    /// Per-task metrics, in input order.
    pub metrics: Vec<TaskMetrics>,
    /// Aggregate summary.
    pub summary: RunSummary,
}

impl SimulationOutcome {
    /// Metrics of one task.
    pub fn metrics_for(&self, id: &TaskId) -> Option<&TaskMetrics> {
        self.metrics.iter().find(|m| &m.id == id)
    }

    /// Final state of one task.
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// Simulation makespan.
    pub fn makespan(&self) -> SimTime {
        self.summary.makespan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simcfs_test_helpers::{alternating, cpu, task};

    fn finished(id: &str, arrival: f64, bursts: Vec<simcfs_types::Burst>, start: f64, end: f64) -> Task {
        let mut t = task(id, arrival, 0, bursts);
        let cpu = t.cpu_demand();
        t.mark_started(start);
        t.record_execution(cpu);
        while t.advance_burst().is_some() {}
        t.mark_finished(end);
        t
    }

    #[test]
    fn test_metrics_formulas() {
        let t = finished("A", 2.0, vec![cpu(4.0)], 5.0, 12.0);
        let m = TaskMetrics::from_task(&t).unwrap();
        assert_eq!(m.response, 3.0);
        assert_eq!(m.turnaround, 10.0);
        assert_eq!(m.waiting, 6.0);
        assert_eq!(m.cpu_consumed, 4.0);
    }

    #[test]
    fn test_waiting_floored_at_zero() {
        let t = finished("A", 0.0, alternating(&[1.0, 8.0, 1.0, 8.0]), 0.0, 18.0);
        let m = TaskMetrics::from_task(&t).unwrap();
        assert_eq!(m.waiting, 0.0);
        assert_eq!(m.io_demand, 16.0);
    }

    #[test]
    fn test_unfinished_task_has_no_metrics() {
        assert!(TaskMetrics::from_task(&task("A", 0.0, 0, vec![cpu(1.0)])).is_none());
    }

    #[test]
    fn test_summary_utilization() {
        let metrics = vec![
            TaskMetrics::from_task(&finished("A", 0.0, vec![cpu(4.0)], 0.0, 4.0)).unwrap(),
            TaskMetrics::from_task(&finished("B", 0.0, alternating(&[2.0, 4.0]), 4.0, 10.0))
                .unwrap(),
        ];
        let summary = RunSummary::from_metrics(&metrics, SimulationStats::default());
        assert_eq!(summary.makespan, 10.0);
        assert_eq!(summary.total_cpu, 6.0);
        assert!((summary.cpu_utilization - 0.6).abs() < 1e-12);
        assert_eq!(summary.avg_turnaround, 7.0);
        assert_eq!(summary.avg_response, 2.0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::from_metrics(&[], SimulationStats::default());
        assert_eq!(summary.tasks, 0);
        assert_eq!(summary.cpu_utilization, 0.0);
    }
}
