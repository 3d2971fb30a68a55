//! The simulation engine.

use crate::queues::{BlockedSet, PendingTasks};
use crate::{
    validate_tasks, EngineConfig, InvariantViolation, RunSummary, SimulationError,
    SimulationOutcome, TaskMetrics,
};
use indexmap::IndexMap;
use serde::Serialize;
use simcfs_core::{EventKind, EventSink, SchedEvent};
use simcfs_fair::{FairnessCalculator, ReadyQueue};
use simcfs_types::{BurstKind, SimTime, Task, TaskDescriptor, TaskId};
use std::time::Instant;
use tracing::{debug, info, trace};

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    /// Distinct simulated instants at which the engine made decisions.
    pub decision_points: u64,
    /// Tasks that arrived.
    pub arrivals: u64,
    /// Times a task was placed on the CPU.
    pub dispatches: u64,
    /// Dispatches of a different task than the one that ran last.
    pub context_switches: u64,
    /// Slices that expired before the CPU burst completed.
    pub preemptions: u64,
    /// I/O bursts started.
    pub io_waits: u64,
    /// Tasks that finished.
    pub exits: u64,
}

/// The task currently on the CPU.
#[derive(Debug)]
struct Running {
    task: Task,
    started_at: SimTime,
    allocated: SimTime,
    stop_at: SimTime,
}

/// Single-CPU fair-share scheduler simulation.
///
/// Owns every task for the duration of the run. Each task is in exactly one
/// place at a time: pending, ready, running, blocked or finished. Multiple
/// runners share nothing and can run side by side.
pub struct SimulationRunner {
    calculator: FairnessCalculator,
    config: EngineConfig,

    /// Simulated clock. Never decreases.
    now: SimTime,

    pending: PendingTasks,
    ready: ReadyQueue,
    current: Option<Running>,
    blocked: BlockedSet,
    finished: Vec<Task>,

    /// Input position of every task, for reporting in input order.
    input_order: IndexMap<TaskId, usize>,

    /// Task that last held the CPU, for context switch accounting.
    last_on_cpu: Option<TaskId>,

    stats: SimulationStats,
}

impl SimulationRunner {
    /// Validate input and configuration and build a runner at t = 0.
    ///
    /// Fails before any simulation happens if a descriptor or the scheduler
    /// configuration is malformed.
    pub fn new(
        config: EngineConfig,
        descriptors: impl IntoIterator<Item = TaskDescriptor>,
    ) -> Result<Self, SimulationError> {
        config.scheduler.validate()?;
        let (tasks, input_order) = validate_tasks(descriptors)?;

        info!(
            tasks = tasks.len(),
            scheduling_period = config.scheduler.scheduling_period,
            min_granularity = config.scheduler.min_granularity,
            "Created simulation runner"
        );

        Ok(Self {
            calculator: FairnessCalculator::new(config.scheduler.clone()),
            config,
            now: 0.0,
            pending: PendingTasks::from_sorted(tasks),
            ready: ReadyQueue::new(),
            current: None,
            blocked: BlockedSet::default(),
            finished: Vec::new(),
            input_order,
            last_on_cpu: None,
            stats: SimulationStats::default(),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════════

    /// Current simulated time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Counters so far.
    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// Runnable tasks.
    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready
    }

    /// Task on the CPU, if any.
    pub fn current(&self) -> Option<&Task> {
        self.current.as_ref().map(|r| &r.task)
    }

    /// Absolute time the current task leaves the CPU.
    pub fn current_stop_time(&self) -> Option<SimTime> {
        self.current.as_ref().map(|r| r.stop_at)
    }

    /// Tasks that have finished so far, in completion order.
    pub fn finished(&self) -> &[Task] {
        &self.finished
    }

    /// Number of tasks not yet arrived.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of tasks waiting on I/O.
    pub fn blocked_len(&self) -> usize {
        self.blocked.len()
    }

    /// Tasks that have not finished yet.
    pub fn unfinished(&self) -> usize {
        self.pending.len()
            + self.ready.len()
            + self.blocked.len()
            + usize::from(self.current.is_some())
    }

    /// Time of the next decision point, if any work remains.
    pub fn next_event_time(&self) -> Option<SimTime> {
        [
            self.pending.next_arrival(),
            self.blocked.next_return(),
            self.current_stop_time(),
        ]
        .into_iter()
        .flatten()
        .min_by(f64::total_cmp)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Driving the simulation
    // ═══════════════════════════════════════════════════════════════════════

    /// Run to completion, reporting to `sink`.
    pub fn run(mut self, sink: &mut impl EventSink) -> Result<SimulationOutcome, SimulationError> {
        let started = Instant::now();
        sink.on_event(
            &SchedEvent::global(self.now, EventKind::RunStart)
                .with_note(format!("{} task(s)", self.pending.len())),
        );

        while self.step(sink)? {
            if let Some(budget) = self.config.wall_clock_budget {
                if started.elapsed() > budget {
                    return Err(SimulationError::DeadlineExceeded {
                        budget,
                        time: self.now,
                    });
                }
            }
        }

        sink.on_event(
            &SchedEvent::global(self.now, EventKind::RunEnd)
                .with_note(format!("{} decision point(s)", self.stats.decision_points)),
        );
        info!(
            makespan = self.now,
            dispatches = self.stats.dispatches,
            preemptions = self.stats.preemptions,
            "Simulation finished"
        );

        Ok(self.into_outcome())
    }

    /// Advance to the next decision point and handle it.
    ///
    /// Everything due at that instant is processed in the order arrivals,
    /// I/O returns, CPU stop; then, if the CPU is free, the next task is
    /// dispatched. Returns `false` once no work remains.
    pub fn step(&mut self, sink: &mut impl EventSink) -> Result<bool, SimulationError> {
        let Some(time) = self.next_event_time() else {
            let unfinished = self.unfinished();
            if unfinished > 0 {
                return Err(InvariantViolation::NoEventWhileWorkRemains {
                    time: self.now,
                    unfinished,
                }
                .into());
            }
            return Ok(false);
        };

        if time < self.now {
            return Err(InvariantViolation::ClockWentBackwards {
                from: self.now,
                to: time,
            }
            .into());
        }
        if let Some(limit) = self.config.max_events {
            if self.stats.decision_points >= limit {
                return Err(SimulationError::EventBudgetExhausted {
                    limit,
                    time: self.now,
                });
            }
        }

        self.now = time;
        self.stats.decision_points += 1;
        trace!(time, "Decision point");

        self.handle_arrivals(sink);
        self.handle_io_returns(sink);
        self.handle_cpu_stop(sink);

        if self.current.is_none() {
            self.dispatch(sink)?;
        }
        Ok(true)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Event handlers
    // ═══════════════════════════════════════════════════════════════════════

    /// Move every task whose arrival time has come out of pending.
    fn handle_arrivals(&mut self, sink: &mut impl EventSink) {
        while let Some(task) = self.pending.pop_arrived(self.now) {
            self.stats.arrivals += 1;
            debug!(time = self.now, task = %task.id(), nice = task.nice().get(), "Task arrived");
            sink.on_event(&SchedEvent::for_task(self.now, EventKind::Arrival, &task));
            self.place(task, sink);
        }
    }

    /// Advance every task whose I/O burst has elapsed.
    fn handle_io_returns(&mut self, sink: &mut impl EventSink) {
        while let Some(mut task) = self.blocked.pop_returned(self.now) {
            sink.on_event(&SchedEvent::for_task(self.now, EventKind::IoReturn, &task));
            task.advance_burst();
            self.place(task, sink);
        }
    }

    /// Account for the current task if its slice ends now.
    fn handle_cpu_stop(&mut self, sink: &mut impl EventSink) {
        if !self.current.as_ref().is_some_and(|r| r.stop_at <= self.now) {
            return;
        }
        let Some(Running {
            mut task,
            started_at,
            allocated,
            ..
        }) = self.current.take()
        else {
            return;
        };

        task.record_execution(allocated);
        self.calculator.update_vruntime(&mut task, allocated);
        sink.on_cpu_slice(task.id(), started_at, self.now);

        if task.time_left_in_current_burst() <= 0.0 {
            sink.on_event(
                &SchedEvent::for_task(self.now, EventKind::BurstComplete, &task).with_note(
                    format!("CPU burst #{} complete", task.current_burst_index()),
                ),
            );
            task.advance_burst();
            self.place(task, sink);
        } else {
            self.stats.preemptions += 1;
            sink.on_event(
                &SchedEvent::for_task(self.now, EventKind::Preempt, &task).with_note(format!(
                    "{:.2} left in burst",
                    task.time_left_in_current_burst()
                )),
            );
            self.ready.add(task);
        }
    }

    /// Route a task by the burst it is now positioned on.
    fn place(&mut self, mut task: Task, sink: &mut impl EventSink) {
        match task.current_burst().map(|b| (b.kind, b.duration)) {
            None => {
                task.mark_finished(self.now);
                self.stats.exits += 1;
                debug!(time = self.now, task = %task.id(), "Task finished");
                sink.on_event(&SchedEvent::for_task(self.now, EventKind::Exit, &task));
                self.finished.push(task);
            }
            Some((BurstKind::Cpu, _)) => {
                self.ready.add(task);
            }
            Some((BurstKind::Io, duration)) => {
                let return_at = self.now + duration;
                self.stats.io_waits += 1;
                sink.on_event(
                    &SchedEvent::for_task(self.now, EventKind::IoStart, &task)
                        .with_note(format!("until {return_at:.2}")),
                );
                self.blocked.insert(return_at, task);
            }
        }
    }

    /// Pick the next task and size its slice.
    fn dispatch(&mut self, sink: &mut impl EventSink) -> Result<(), SimulationError> {
        let Some(mut task) = self.ready.pick_next() else {
            return Ok(());
        };

        if !task.current_burst().is_some_and(|b| b.is_cpu()) {
            return Err(InvariantViolation::DispatchOutsideCpuBurst {
                task: task.id().clone(),
            }
            .into());
        }

        // The task has left the queue, so the remaining weight excludes it.
        let slice = self
            .calculator
            .allocate_slice(&task, self.ready.total_weight());
        let allocated = slice.min(task.time_left_in_current_burst());
        if allocated.is_nan() || allocated <= 0.0 {
            return Err(InvariantViolation::NonPositiveSlice {
                task: task.id().clone(),
                slice: allocated,
            }
            .into());
        }

        let first_run = task.mark_started(self.now);
        self.stats.dispatches += 1;
        if self.last_on_cpu.as_ref() != Some(task.id()) {
            self.stats.context_switches += 1;
            self.last_on_cpu = Some(task.id().clone());
        }

        let stop_at = self.now + allocated;
        debug!(
            time = self.now,
            task = %task.id(),
            vruntime = task.vruntime(),
            slice,
            allocated,
            "Dispatched task"
        );
        let note = if first_run {
            format!("slice {allocated:.2} (first run)")
        } else {
            format!("slice {allocated:.2}")
        };
        sink.on_event(&SchedEvent::for_task(self.now, EventKind::Dispatch, &task).with_note(note));

        self.current = Some(Running {
            task,
            started_at: self.now,
            allocated,
            stop_at,
        });
        Ok(())
    }

    fn into_outcome(self) -> SimulationOutcome {
        let mut tasks = self.finished;
        let order = self.input_order;
        tasks.sort_by_key(|t| order.get(t.id()).copied().unwrap_or(usize::MAX));

        let metrics: Vec<TaskMetrics> = tasks.iter().filter_map(TaskMetrics::from_task).collect();
        let summary = RunSummary::from_metrics(&metrics, self.stats);
        SimulationOutcome {
            tasks,
            metrics,
            summary,
        }
    }
}
