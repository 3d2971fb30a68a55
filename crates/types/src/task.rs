//! The simulated process record.

use crate::{Burst, BurstKind, Nice, SimTime, TaskId, TypeError};
use serde::{Deserialize, Serialize};

/// Raw task description as produced by an input source.
///
/// Nothing here is validated yet; see [`TaskDescriptor::to_task`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Task identifier.
    pub id: TaskId,
    /// Time at which the task becomes known to the scheduler.
    pub arrival_time: SimTime,
    /// Raw nice value.
    pub nice: i32,
    /// Ordered CPU / I/O demands.
    pub bursts: Vec<Burst>,
}

impl TaskDescriptor {
    /// Create a descriptor.
    pub fn new(
        id: impl Into<TaskId>,
        arrival_time: SimTime,
        nice: i32,
        bursts: Vec<Burst>,
    ) -> Self {
        Self {
            id: id.into(),
            arrival_time,
            nice,
            bursts,
        }
    }

    /// Validate the priority and every burst, producing a fresh [`Task`].
    ///
    /// The arrival time and identifier are checked by the engine, which
    /// has the context (other tasks) needed to report duplicates.
    pub fn to_task(&self) -> Result<Task, TypeError> {
        let nice = Nice::new(self.nice)?;
        let bursts = self
            .bursts
            .iter()
            .map(|b| Burst::new(b.kind, b.duration))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Task::new(self.id.clone(), self.arrival_time, nice, bursts))
    }
}

/// A simulated process.
///
/// Owned by exactly one engine collection at a time. Fairness fields are
/// mutated by the engine and the fairness calculator; once
/// [`Task::end_time`] is set the record is never touched again.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    nice: Nice,
    bursts: Vec<Burst>,
    current_burst: usize,
    time_left: SimTime,
    vruntime: f64,
    exec_time: SimTime,
    arrival_time: SimTime,
    start_time: Option<SimTime>,
    end_time: Option<SimTime>,
}

impl Task {
    /// Create a task positioned on its first burst.
    pub fn new(id: impl Into<TaskId>, arrival_time: SimTime, nice: Nice, bursts: Vec<Burst>) -> Self {
        let time_left = bursts.first().map(|b| b.duration).unwrap_or(0.0);
        Self {
            id: id.into(),
            nice,
            bursts,
            current_burst: 0,
            time_left,
            vruntime: 0.0,
            exec_time: 0.0,
            arrival_time,
            start_time: None,
            end_time: None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════

    /// Task identifier.
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Static priority.
    pub fn nice(&self) -> Nice {
        self.nice
    }

    /// Scheduling weight derived from the nice value.
    pub fn weight(&self) -> u32 {
        self.nice.weight()
    }

    /// True once every burst has been consumed. A task without bursts is
    /// finished from the start.
    pub fn is_finished(&self) -> bool {
        self.current_burst >= self.bursts.len()
    }

    /// All bursts, in order.
    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    /// Index of the burst in progress.
    pub fn current_burst_index(&self) -> usize {
        self.current_burst
    }

    /// The burst in progress, if any.
    pub fn current_burst(&self) -> Option<&Burst> {
        self.bursts.get(self.current_burst)
    }

    /// Remaining duration of the burst in progress.
    pub fn time_left_in_current_burst(&self) -> SimTime {
        self.time_left
    }

    /// Accumulated virtual runtime.
    pub fn vruntime(&self) -> f64 {
        self.vruntime
    }

    /// Total CPU time actually consumed.
    pub fn cumulative_exec_time(&self) -> SimTime {
        self.exec_time
    }

    /// Arrival time.
    pub fn arrival_time(&self) -> SimTime {
        self.arrival_time
    }

    /// Time of the first dispatch.
    pub fn start_time(&self) -> Option<SimTime> {
        self.start_time
    }

    /// Completion time.
    pub fn end_time(&self) -> Option<SimTime> {
        self.end_time
    }

    /// Total demand of one burst kind.
    pub fn demand(&self, kind: BurstKind) -> SimTime {
        self.bursts
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| b.duration)
            .sum()
    }

    /// Total CPU demand over all bursts.
    pub fn cpu_demand(&self) -> SimTime {
        self.demand(BurstKind::Cpu)
    }

    /// Total I/O demand over all bursts.
    pub fn io_demand(&self) -> SimTime {
        self.demand(BurstKind::Io)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Mutators (engine and calculator only)
    // ═══════════════════════════════════════════════════════════════════════

    /// Add a virtual runtime delta. Negative deltas are ignored.
    pub fn add_vruntime(&mut self, delta: f64) {
        debug_assert!(self.end_time.is_none(), "finished task mutated");
        if delta > 0.0 {
            self.vruntime += delta;
        }
    }

    /// Raise vruntime to at least `floor`. Never lowers it.
    pub fn raise_vruntime_to(&mut self, floor: f64) {
        debug_assert!(self.end_time.is_none(), "finished task mutated");
        self.vruntime = self.vruntime.max(floor);
    }

    /// Account `duration` of CPU execution against the current burst.
    pub fn record_execution(&mut self, duration: SimTime) {
        debug_assert!(self.end_time.is_none(), "finished task mutated");
        self.exec_time += duration;
        self.time_left -= duration;
    }

    /// Move the cursor to the next burst, resetting the remaining time from
    /// its duration. Returns the new current burst, or `None` when the task
    /// has run out of bursts.
    pub fn advance_burst(&mut self) -> Option<Burst> {
        debug_assert!(self.end_time.is_none(), "finished task mutated");
        if self.current_burst < self.bursts.len() {
            self.current_burst += 1;
        }
        let next = self.bursts.get(self.current_burst).copied();
        self.time_left = next.map(|b| b.duration).unwrap_or(0.0);
        next
    }

    /// Record the first dispatch. Later calls are no-ops.
    ///
    /// Returns true if this was the first dispatch.
    pub fn mark_started(&mut self, now: SimTime) -> bool {
        if self.start_time.is_none() {
            self.start_time = Some(now);
            true
        } else {
            false
        }
    }

    /// Record completion.
    pub fn mark_finished(&mut self, now: SimTime) {
        debug_assert!(self.is_finished(), "task finished with bursts left");
        debug_assert!(self.end_time.is_none(), "task finished twice");
        self.end_time = Some(now);
    }
}
