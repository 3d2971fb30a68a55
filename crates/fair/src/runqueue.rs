//! Vruntime-ordered ready queue.

use simcfs_types::{Task, TaskId, TimeKey};
use std::collections::BTreeMap;
use tracing::trace;

/// Ordering key: vruntime first, then insertion sequence.
///
/// The sequence number makes the order total and deterministic: among equal
/// vruntimes the task queued first is picked first.
type QueueKey = (TimeKey, u64);

/// Runnable tasks that are neither on the CPU nor blocked.
///
/// Owns its tasks. A task leaves the queue exactly when it is picked or
/// removed. Add and pick are `O(log n)`.
#[derive(Debug, Default)]
pub struct ReadyQueue {
    tasks: BTreeMap<QueueKey, Task>,
    next_seq: u64,
}

impl ReadyQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task.
    ///
    /// If the queue is not empty, the task's vruntime is first raised to the
    /// current minimum so that a task returning from a long sleep cannot
    /// monopolise the CPU on the strength of a stale vruntime.
    pub fn add(&mut self, mut task: Task) {
        debug_assert!(
            !self.contains(task.id()),
            "task {} queued twice",
            task.id()
        );

        if let Some(min) = self.min_vruntime() {
            let before = task.vruntime();
            task.raise_vruntime_to(min);
            if task.vruntime() > before {
                trace!(
                    task = %task.id(),
                    from = before,
                    to = task.vruntime(),
                    "Clamped vruntime to queue minimum"
                );
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert((TimeKey(task.vruntime()), seq), task);
    }

    /// Remove and return the task with the smallest vruntime.
    ///
    /// Returns `None` on an empty queue.
    pub fn pick_next(&mut self) -> Option<Task> {
        self.tasks.pop_first().map(|(_, task)| task)
    }

    /// Peek at the task `pick_next` would return.
    pub fn peek_next(&self) -> Option<&Task> {
        self.tasks.first_key_value().map(|(_, task)| task)
    }

    /// Remove a specific task, e.g. for termination.
    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let key = self
            .tasks
            .iter()
            .find(|(_, task)| task.id() == id)
            .map(|(key, _)| *key)?;
        self.tasks.remove(&key)
    }

    /// Sum of the weights of every queued task.
    pub fn total_weight(&self) -> u64 {
        self.tasks.values().map(|t| u64::from(t.weight())).sum()
    }

    /// Smallest vruntime among queued tasks.
    pub fn min_vruntime(&self) -> Option<f64> {
        self.tasks.first_key_value().map(|((vruntime, _), _)| vruntime.get())
    }

    /// Check if a task with this id is queued.
    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.values().any(|t| t.id() == id)
    }

    /// Queued tasks in pick order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
