//! Fair-share scheduling policy.
//!
//! This crate holds the two policy pieces the engine consults at every
//! scheduling decision:
//!
//! - [`FairnessCalculator`] sizes a time slice from the weights of the
//!   ready tasks and charges executed time to a task's virtual runtime.
//! - [`ReadyQueue`] keeps runnable tasks ordered by virtual runtime and
//!   hands out the one that is furthest behind.
//!
//! # Fairness model
//!
//! ```text
//!   slice    = max(min_granularity, period * w / Σw)
//!   vruntime += ran * baseline_weight / w
//! ```
//!
//! Heavy (low nice) tasks get longer slices and their vruntime grows more
//! slowly, so they are picked more often. A task entering the queue has its
//! vruntime clamped up to the queue minimum, so time spent sleeping never
//! turns into a burst of catch-up CPU.

mod calculator;
mod config;
mod runqueue;

pub use calculator::FairnessCalculator;
pub use config::{ConfigError, SchedulerConfig};
pub use runqueue::ReadyQueue;
