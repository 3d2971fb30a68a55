//! Seeded random task sets.

use crate::workload::WorkloadGenerator;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use simcfs_types::{Burst, BurstKind, Nice, SimTime, TaskDescriptor};
use std::ops::RangeInclusive;

/// Generates random tasks with alternating CPU and I/O bursts.
///
/// The same seed always yields the same workload. Times are rounded to
/// hundredths so generated task files stay readable.
#[derive(Clone, Debug)]
pub struct SyntheticWorkload {
    /// Number of tasks.
    pub tasks: usize,

    /// Seed for the task set.
    pub seed: u64,

    /// Latest arrival time.
    pub max_arrival: SimTime,

    /// Upper bound on CPU bursts per task. Each task has at least one.
    pub max_cpu_bursts: usize,

    /// Range nice values are drawn from.
    pub nice: RangeInclusive<i32>,

    /// Range CPU burst durations are drawn from.
    pub cpu_burst: RangeInclusive<SimTime>,

    /// Range I/O burst durations are drawn from.
    pub io_burst: RangeInclusive<SimTime>,
}

impl Default for SyntheticWorkload {
    fn default() -> Self {
        Self {
            tasks: 8,
            seed: 12345,
            max_arrival: 20.0,
            max_cpu_bursts: 3,
            nice: Nice::MIN.get()..=Nice::MAX.get(),
            cpu_burst: 0.5..=12.0,
            io_burst: 1.0..=10.0,
        }
    }
}

impl SyntheticWorkload {
    /// Create a workload of `tasks` tasks.
    pub fn new(tasks: usize) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the latest arrival time.
    pub fn with_max_arrival(mut self, max_arrival: SimTime) -> Self {
        self.max_arrival = max_arrival.max(0.0);
        self
    }

    /// Set the upper bound on CPU bursts per task.
    pub fn with_max_cpu_bursts(mut self, max: usize) -> Self {
        self.max_cpu_bursts = max.max(1);
        self
    }

    /// Restrict nice values, clamped to the supported range.
    pub fn with_nice_range(mut self, nice: RangeInclusive<i32>) -> Self {
        let lo = (*nice.start()).clamp(Nice::MIN.get(), Nice::MAX.get());
        let hi = (*nice.end()).clamp(lo, Nice::MAX.get());
        self.nice = lo..=hi;
        self
    }

    /// Generate the task set for the configured seed.
    pub fn generate(&self) -> Vec<TaskDescriptor> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut generator = self.clone();
        generator.generate_batch(self.tasks, &mut rng)
    }
}

fn hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Draw a positive duration from `range`.
fn duration(range: &RangeInclusive<SimTime>, rng: &mut impl Rng) -> SimTime {
    hundredths(rng.gen_range(range.clone())).max(0.01)
}

impl WorkloadGenerator for SyntheticWorkload {
    fn generate_one(&mut self, index: usize, rng: &mut impl Rng) -> TaskDescriptor {
        let arrival = hundredths(rng.gen_range(0.0..=self.max_arrival));
        let nice = rng.gen_range(self.nice.clone());
        let cpu_bursts = rng.gen_range(1..=self.max_cpu_bursts.max(1));

        let mut bursts = Vec::with_capacity(cpu_bursts * 2 - 1);
        for i in 0..cpu_bursts {
            if i > 0 {
                bursts.push(Burst {
                    kind: BurstKind::Io,
                    duration: duration(&self.io_burst, rng),
                });
            }
            bursts.push(Burst {
                kind: BurstKind::Cpu,
                duration: duration(&self.cpu_burst, rng),
            });
        }

        TaskDescriptor::new(format!("T{index}"), arrival, nice, bursts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_workload() {
        let a = SyntheticWorkload::new(20).with_seed(7).generate();
        let b = SyntheticWorkload::new(20).with_seed(7).generate();
        let c = SyntheticWorkload::new(20).with_seed(8).generate();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_tasks_respect_bounds() {
        let workload = SyntheticWorkload::new(200)
            .with_max_arrival(5.0)
            .with_max_cpu_bursts(4)
            .with_nice_range(-3..=3);
        for task in workload.generate() {
            assert!((0.0..=5.0).contains(&task.arrival_time));
            assert!((-3..=3).contains(&task.nice));
            assert!(task.bursts.len() % 2 == 1 && task.bursts.len() <= 7);
            for (i, burst) in task.bursts.iter().enumerate() {
                assert_eq!(burst.is_cpu(), i % 2 == 0);
                assert!(burst.duration > 0.0);
            }
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let tasks = SyntheticWorkload::new(50).generate();
        let ids: std::collections::BTreeSet<_> = tasks.iter().map(|t| &t.id).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_nice_range_is_clamped() {
        let workload = SyntheticWorkload::default().with_nice_range(-100..=100);
        assert_eq!(workload.nice, -20..=19);
    }
}
