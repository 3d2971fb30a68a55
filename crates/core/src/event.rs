//! Scheduling events reported by the engine.

use serde::Serialize;
use simcfs_types::{Nice, SimTime, Task, TaskId};
use std::fmt;

/// Kind of engine-significant occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    // ═══════════════════════════════════════════════════════════════════════
    // Run lifecycle
    // ═══════════════════════════════════════════════════════════════════════
    /// Simulation loop starting.
    RunStart,

    /// No work left; simulation loop finished.
    RunEnd,

    // ═══════════════════════════════════════════════════════════════════════
    // Task lifecycle
    // ═══════════════════════════════════════════════════════════════════════
    /// Task became known to the scheduler.
    Arrival,

    /// Task placed on the CPU with a freshly computed slice.
    Dispatch,

    /// Slice expired before the CPU burst completed.
    Preempt,

    /// A burst finished and the task moved on to the next one.
    BurstComplete,

    /// Task started waiting on simulated I/O.
    IoStart,

    /// Task's I/O wait elapsed.
    IoReturn,

    /// All bursts consumed.
    Exit,
}

impl EventKind {
    /// Get a short upper-case label for this event kind.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::RunStart => "START",
            EventKind::RunEnd => "END",
            EventKind::Arrival => "ARRIVAL",
            EventKind::Dispatch => "DISPATCH",
            EventKind::Preempt => "PREEMPT",
            EventKind::BurstComplete => "BURST_DONE",
            EventKind::IoStart => "IO_START",
            EventKind::IoReturn => "IO_RETURN",
            EventKind::Exit => "EXIT",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Point-in-time view of the task an event refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSnapshot {
    /// Task identifier.
    pub id: TaskId,
    /// Static priority.
    pub nice: Nice,
    /// Virtual runtime at the time of the event.
    pub vruntime: f64,
}

impl TaskSnapshot {
    /// Capture the current state of a task.
    pub fn of(task: &Task) -> Self {
        Self {
            id: task.id().clone(),
            nice: task.nice(),
            vruntime: task.vruntime(),
        }
    }
}

/// A timestamped fact reported by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedEvent {
    /// Simulated time of the event.
    pub time: SimTime,
    /// What happened.
    pub kind: EventKind,
    /// The task involved, if any. Run boundaries carry no task.
    pub task: Option<TaskSnapshot>,
    /// Free-text annotation.
    pub note: Option<String>,
}

impl SchedEvent {
    /// Create an event that does not concern a particular task.
    pub fn global(time: SimTime, kind: EventKind) -> Self {
        Self {
            time,
            kind,
            task: None,
            note: None,
        }
    }

    /// Create an event about a task.
    pub fn for_task(time: SimTime, kind: EventKind, task: &Task) -> Self {
        Self {
            time,
            kind,
            task: Some(TaskSnapshot::of(task)),
            note: None,
        }
    }

    /// Attach an annotation.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Identifier of the task involved, if any.
    pub fn task_id(&self) -> Option<&TaskId> {
        self.task.as_ref().map(|t| &t.id)
    }
}
