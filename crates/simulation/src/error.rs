//! Error types for simulation runs.

use simcfs_fair::ConfigError;
use simcfs_types::{BurstKind, SimTime, TaskId};
use std::time::Duration;
use thiserror::Error;

/// Malformed input, detected before the simulation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Task identifier is empty.
    #[error("task #{index} has an empty identifier")]
    EmptyId {
        /// Position of the task in the input.
        index: usize,
    },

    /// Two tasks share an identifier.
    #[error("duplicate task identifier {0}")]
    DuplicateId(TaskId),

    /// Arrival time is negative or not a finite number.
    #[error("task {task}: arrival time must be finite and non-negative, got {arrival}")]
    InvalidArrival {
        /// Offending task.
        task: TaskId,
        /// Rejected arrival time.
        arrival: SimTime,
    },

    /// Nice value outside `-20..=19`.
    #[error("task {task}: nice value {nice} is outside the supported range -20..=19")]
    NiceOutOfRange {
        /// Offending task.
        task: TaskId,
        /// Rejected nice value.
        nice: i32,
    },

    /// Burst duration is zero, negative or not finite.
    #[error("task {task}: {kind} burst #{index} has non-positive duration {duration}")]
    NonPositiveBurst {
        /// Offending task.
        task: TaskId,
        /// Position of the burst in the task's sequence.
        index: usize,
        /// Kind of the burst.
        kind: BurstKind,
        /// Rejected duration.
        duration: SimTime,
    },
}

/// Internal consistency failure. Always a logic defect, never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    /// No next event exists although tasks are still unfinished.
    #[error("no next event at t={time} while {unfinished} task(s) remain unfinished")]
    NoEventWhileWorkRemains {
        /// Clock value when the loop stalled.
        time: SimTime,
        /// Tasks not yet finished.
        unfinished: usize,
    },

    /// The next decision point lies in the past.
    #[error("clock would move backwards from {from} to {to}")]
    ClockWentBackwards {
        /// Current clock.
        from: SimTime,
        /// Proposed next time.
        to: SimTime,
    },

    /// A dispatch produced an empty or negative allocation.
    #[error("task {task} allocated non-positive slice {slice}")]
    NonPositiveSlice {
        /// Dispatched task.
        task: TaskId,
        /// Computed allocation.
        slice: SimTime,
    },

    /// A task was picked from the ready queue while not in a CPU burst.
    #[error("task {task} dispatched outside a CPU burst")]
    DispatchOutsideCpuBurst {
        /// Dispatched task.
        task: TaskId,
    },
}

/// Everything that can stop a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Input rejected before the run.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Scheduler tunables rejected before the run.
    #[error("invalid scheduler configuration: {0}")]
    Config(#[from] ConfigError),

    /// Engine invariant broken during the run.
    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    /// The configured decision-point limit was reached.
    #[error("event budget of {limit} decision points exhausted at t={time}")]
    EventBudgetExhausted {
        /// Configured limit.
        limit: u64,
        /// Simulated time when the limit hit.
        time: SimTime,
    },

    /// The configured wall-clock budget elapsed.
    #[error("wall-clock budget of {budget:?} exhausted at t={time}")]
    DeadlineExceeded {
        /// Configured budget.
        budget: Duration,
        /// Simulated time when the budget ran out.
        time: SimTime,
    },
}
