//! Engine-owned task collections: not-yet-arrived and blocked-on-I/O.

use simcfs_types::{SimTime, Task, TimeKey};
use std::collections::{BTreeMap, VecDeque};

/// Tasks that have not arrived yet, ordered by arrival time.
#[derive(Debug, Default)]
pub(crate) struct PendingTasks {
    tasks: VecDeque<Task>,
}

impl PendingTasks {
    /// Build from tasks already sorted by arrival time.
    pub(crate) fn from_sorted(tasks: Vec<Task>) -> Self {
        debug_assert!(tasks
            .windows(2)
            .all(|w| w[0].arrival_time() <= w[1].arrival_time()));
        Self {
            tasks: tasks.into(),
        }
    }

    /// Arrival time of the next task to arrive.
    pub(crate) fn next_arrival(&self) -> Option<SimTime> {
        self.tasks.front().map(Task::arrival_time)
    }

    /// Remove the next task if it has arrived by `now`.
    pub(crate) fn pop_arrived(&mut self, now: SimTime) -> Option<Task> {
        if self.next_arrival()? <= now {
            self.tasks.pop_front()
        } else {
            None
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }
}

/// Tasks waiting on simulated I/O, keyed by return time.
///
/// Equal return times come back in the order they blocked.
#[derive(Debug, Default)]
pub(crate) struct BlockedSet {
    tasks: BTreeMap<(TimeKey, u64), Task>,
    next_seq: u64,
}

impl BlockedSet {
    /// Block a task until `return_time`.
    pub(crate) fn insert(&mut self, return_time: SimTime, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert((TimeKey(return_time), seq), task);
    }

    /// Earliest scheduled return time.
    pub(crate) fn next_return(&self) -> Option<SimTime> {
        self.tasks
            .first_key_value()
            .map(|((time, _), _)| time.get())
    }

    /// Remove the earliest blocked task if its I/O completes by `now`.
    pub(crate) fn pop_returned(&mut self, now: SimTime) -> Option<Task> {
        if self.next_return()? <= now {
            self.tasks.pop_first().map(|(_, task)| task)
        } else {
            None
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simcfs_test_helpers::{cpu, task};

    #[test]
    fn test_pending_pops_in_arrival_order() {
        let mut pending = PendingTasks::from_sorted(vec![
            task("A", 0.0, 0, vec![cpu(1.0)]),
            task("B", 0.0, 0, vec![cpu(1.0)]),
            task("C", 4.0, 0, vec![cpu(1.0)]),
        ]);
        assert_eq!(pending.next_arrival(), Some(0.0));
        assert_eq!(pending.pop_arrived(0.0).unwrap().id().as_str(), "A");
        assert_eq!(pending.pop_arrived(0.0).unwrap().id().as_str(), "B");
        assert!(pending.pop_arrived(3.9).is_none());
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.pop_arrived(4.0).unwrap().id().as_str(), "C");
        assert!(pending.next_arrival().is_none());
    }

    #[test]
    fn test_blocked_returns_by_time_then_fifo() {
        let mut blocked = BlockedSet::default();
        blocked.insert(9.0, task("late", 0.0, 0, vec![cpu(1.0)]));
        blocked.insert(5.0, task("first", 0.0, 0, vec![cpu(1.0)]));
        blocked.insert(5.0, task("second", 0.0, 0, vec![cpu(1.0)]));

        assert_eq!(blocked.next_return(), Some(5.0));
        assert_eq!(blocked.pop_returned(5.0).unwrap().id().as_str(), "first");
        assert_eq!(blocked.pop_returned(5.0).unwrap().id().as_str(), "second");
        assert!(blocked.pop_returned(5.0).is_none());
        assert_eq!(blocked.len(), 1);
    }
}
