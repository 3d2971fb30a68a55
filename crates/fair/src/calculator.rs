//! Time slice and virtual runtime arithmetic.

use crate::SchedulerConfig;
use simcfs_types::{SimTime, Task};
use tracing::trace;

/// Pure fairness arithmetic, parameterised by a [`SchedulerConfig`].
///
/// Holds no per-run state, so one calculator can serve any number of
/// engines.
#[derive(Debug, Clone, Default)]
pub struct FairnessCalculator {
    config: SchedulerConfig,
}

impl FairnessCalculator {
    /// Create a calculator with the given tunables.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The tunables in use.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Size the next slice for `candidate`.
    ///
    /// `other_ready_weight` is the summed weight of every other runnable
    /// task; the candidate's own weight is added here. The result is never
    /// below the minimum granularity, and a candidate with no competition
    /// gets the whole period.
    pub fn allocate_slice(&self, candidate: &Task, other_ready_weight: u64) -> SimTime {
        let weight = u64::from(candidate.weight());
        let total_weight = other_ready_weight + weight;
        if total_weight == 0 {
            return self.config.scheduling_period;
        }

        let share = self.config.scheduling_period * weight as f64 / total_weight as f64;
        let slice = share.max(self.config.min_granularity);
        trace!(
            task = %candidate.id(),
            weight,
            total_weight,
            slice,
            "Allocated slice"
        );
        slice
    }

    /// Virtual runtime a task of `weight` accrues for `duration` of CPU.
    pub fn vruntime_delta(&self, weight: u32, duration: SimTime) -> f64 {
        duration * f64::from(self.config.baseline_weight) / f64::from(weight)
    }

    /// Charge `duration` of actual execution to the task's vruntime.
    ///
    /// Returns the delta applied. Non-positive durations leave the task
    /// untouched.
    pub fn update_vruntime(&self, task: &mut Task, duration: SimTime) -> f64 {
        if duration <= 0.0 {
            return 0.0;
        }
        let delta = self.vruntime_delta(task.weight(), duration);
        task.add_vruntime(delta);
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simcfs_test_helpers::{cpu, task};

    fn calc() -> FairnessCalculator {
        FairnessCalculator::default()
    }

    fn weight_of(tasks: &[Task]) -> u64 {
        tasks.iter().map(|t| u64::from(t.weight())).sum()
    }

    #[test]
    fn test_single_task_gets_full_period() {
        let t = task("A", 0.0, 0, vec![cpu(5.0)]);
        assert_eq!(calc().allocate_slice(&t, 0), 6.0);
    }

    #[test]
    fn test_equal_weights_split_period_exactly() {
        for n in [2usize, 3, 4, 8] {
            let tasks: Vec<Task> = (0..n)
                .map(|i| task(&format!("T{i}"), 0.0, 0, vec![cpu(5.0)]))
                .collect();
            let total = weight_of(&tasks);

            let slices: Vec<f64> = tasks
                .iter()
                .map(|t| calc().allocate_slice(t, total - u64::from(t.weight())))
                .collect();

            assert!(slices.windows(2).all(|w| w[0] == w[1]));
            assert_eq!(slices.iter().sum::<f64>(), 6.0, "n = {n}");
        }
    }

    #[test]
    fn test_two_nice_zero_tasks_get_three() {
        let a = task("A", 0.0, 0, vec![cpu(10.0)]);
        assert_eq!(calc().allocate_slice(&a, 1024), 3.0);
    }

    #[test]
    fn test_slice_floor_under_skew() {
        let light = task("L", 0.0, 19, vec![cpu(5.0)]);
        let heavy_weight = 88761 * 10;
        let slice = calc().allocate_slice(&light, heavy_weight);
        assert_eq!(slice, 0.75);

        let heavy = task("H", 0.0, -20, vec![cpu(5.0)]);
        let slice = calc().allocate_slice(&heavy, 15);
        assert!(slice >= 0.75 && slice <= 6.0);
    }

    #[test]
    fn test_lower_nice_gets_longer_slice() {
        for (hi, lo) in [(-5, 0), (0, 5), (-20, 19), (3, 4)] {
            let a = task("A", 0.0, hi, vec![cpu(5.0)]);
            let b = task("B", 0.0, lo, vec![cpu(5.0)]);
            let total = u64::from(a.weight()) + u64::from(b.weight());
            let slice_a = calc().allocate_slice(&a, total - u64::from(a.weight()));
            let slice_b = calc().allocate_slice(&b, total - u64::from(b.weight()));
            assert!(slice_a >= slice_b, "nice {hi} vs {lo}");
        }
    }

    #[test]
    fn test_slices_proportional_to_weight() {
        let a = task("A", 0.0, 0, vec![cpu(5.0)]);
        let b = task("B", 0.0, 5, vec![cpu(5.0)]);
        let slice_a = calc().allocate_slice(&a, u64::from(b.weight()));
        let slice_b = calc().allocate_slice(&b, u64::from(a.weight()));
        let ratio = slice_a / slice_b;
        let expected = f64::from(a.weight()) / f64::from(b.weight());
        assert!((ratio - expected).abs() < 1e-9);
    }

    #[test]
    fn test_vruntime_nice_zero_tracks_runtime() {
        let mut t = task("A", 0.0, 0, vec![cpu(5.0)]);
        calc().update_vruntime(&mut t, 2.5);
        assert_eq!(t.vruntime(), 2.5);
    }

    #[test]
    fn test_vruntime_additive() {
        let mut split = task("A", 0.0, 7, vec![cpu(5.0)]);
        let mut whole = task("B", 0.0, 7, vec![cpu(5.0)]);
        calc().update_vruntime(&mut split, 1.5);
        calc().update_vruntime(&mut split, 2.5);
        calc().update_vruntime(&mut whole, 4.0);
        assert!((split.vruntime() - whole.vruntime()).abs() < 1e-9);
    }

    #[test]
    fn test_vruntime_grows_faster_for_low_priority() {
        let mut high = task("H", 0.0, -5, vec![cpu(10.0)]);
        let mut low = task("L", 0.0, 0, vec![cpu(10.0)]);
        calc().update_vruntime(&mut high, 10.0);
        calc().update_vruntime(&mut low, 10.0);
        assert!(low.vruntime() > high.vruntime());
        assert!(high.vruntime() > 0.0);
    }

    #[test]
    fn test_vruntime_untouched_without_execution() {
        let mut t = task("A", 0.0, 0, vec![cpu(5.0)]);
        assert_eq!(calc().update_vruntime(&mut t, 0.0), 0.0);
        assert_eq!(t.vruntime(), 0.0);
    }

    #[test]
    fn test_custom_baseline_weight() {
        let calc = FairnessCalculator::new(SchedulerConfig::default().with_baseline_weight(2048));
        let mut t = task("A", 0.0, 0, vec![cpu(5.0)]);
        calc.update_vruntime(&mut t, 1.0);
        assert_eq!(t.vruntime(), 2.0);
    }
}
