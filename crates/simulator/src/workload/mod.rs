//! Workload generation.
//!
//! Produces task sets for experiments when no task file is given.

mod synthetic;

pub use synthetic::SyntheticWorkload;

use simcfs_types::TaskDescriptor;

/// Trait for generating task workloads.
pub trait WorkloadGenerator {
    /// Generate the task at position `index` of a workload.
    fn generate_one(&mut self, index: usize, rng: &mut impl rand::Rng) -> TaskDescriptor;

    /// Generate `count` tasks.
    fn generate_batch(&mut self, count: usize, rng: &mut impl rand::Rng) -> Vec<TaskDescriptor> {
        (0..count).map(|i| self.generate_one(i, rng)).collect()
    }
}
