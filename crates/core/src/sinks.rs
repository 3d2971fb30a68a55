//! Stock event sinks.

use crate::{EventKind, EventSink, SchedEvent};
use serde::Serialize;
use simcfs_types::{SimTime, TaskId};
use tracing::{debug, info, trace};

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: &SchedEvent) {}
}

/// One interval a task spent on the CPU.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuSlice {
    /// Task that ran.
    pub task: TaskId,
    /// Dispatch time.
    pub start: SimTime,
    /// Time the task left the CPU.
    pub end: SimTime,
}

impl CpuSlice {
    /// Length of the interval.
    pub fn duration(&self) -> SimTime {
        self.end - self.start
    }
}

/// Keeps every event and CPU slice in memory.
///
/// Primarily for tests and for consumers that render after the run.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<SchedEvent>,
    slices: Vec<CpuSlice>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in emission order.
    pub fn events(&self) -> &[SchedEvent] {
        &self.events
    }

    /// All recorded CPU slices, in emission order.
    pub fn slices(&self) -> &[CpuSlice] {
        &self.slices
    }

    /// Events of one kind.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &SchedEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Number of events of one kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Event kinds in emission order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(|e| e.kind).collect()
    }

    /// CPU slices of one task.
    pub fn slices_for<'a>(&'a self, task: &'a TaskId) -> impl Iterator<Item = &'a CpuSlice> {
        self.slices.iter().filter(move |s| &s.task == task)
    }

    /// Task ids in dispatch order.
    pub fn dispatch_order(&self) -> Vec<TaskId> {
        self.of_kind(EventKind::Dispatch)
            .filter_map(|e| e.task_id().cloned())
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn on_event(&mut self, event: &SchedEvent) {
        self.events.push(event.clone());
    }

    fn on_cpu_slice(&mut self, task: &TaskId, start: SimTime, end: SimTime) {
        self.slices.push(CpuSlice {
            task: task.clone(),
            start,
            end,
        });
    }
}

/// Forwards events to `tracing`.
///
/// Run boundaries and exits log at `info`, per-task transitions at
/// `debug`, CPU slices at `trace`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&mut self, event: &SchedEvent) {
        let note = event.note.as_deref().unwrap_or("");
        match (&event.task, event.kind) {
            (None, kind) => info!(time = event.time, event = %kind, note, "Scheduler event"),
            (Some(task), EventKind::Exit) => info!(
                time = event.time,
                task = %task.id,
                nice = task.nice.get(),
                vruntime = task.vruntime,
                note,
                "Task exited"
            ),
            (Some(task), kind) => debug!(
                time = event.time,
                event = %kind,
                task = %task.id,
                nice = task.nice.get(),
                vruntime = task.vruntime,
                note,
                "Task event"
            ),
        }
    }

    fn on_cpu_slice(&mut self, task: &TaskId, start: SimTime, end: SimTime) {
        trace!(task = %task, start, end, "CPU slice");
    }
}
