//! The engine's output interface.

use crate::SchedEvent;
use simcfs_types::{SimTime, TaskId};

/// Receives the facts reported by the scheduling engine.
///
/// Sinks observe; they never influence the simulation. Calls arrive in
/// strictly non-decreasing simulated time order.
///
/// # Example
///
/// ```ignore
/// struct Counter(usize);
///
/// impl EventSink for Counter {
///     fn on_event(&mut self, _event: &SchedEvent) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait EventSink {
    /// Called for every engine-significant occurrence.
    fn on_event(&mut self, event: &SchedEvent);

    /// Called once for every interval a task actually spent on the CPU.
    ///
    /// `start..end` is non-empty. The default implementation ignores it.
    fn on_cpu_slice(&mut self, task: &TaskId, start: SimTime, end: SimTime) {
        let _ = (task, start, end);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_event(&mut self, event: &SchedEvent) {
        (**self).on_event(event)
    }

    fn on_cpu_slice(&mut self, task: &TaskId, start: SimTime, end: SimTime) {
        (**self).on_cpu_slice(task, start, end)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn on_event(&mut self, event: &SchedEvent) {
        (**self).on_event(event)
    }

    fn on_cpu_slice(&mut self, task: &TaskId, start: SimTime, end: SimTime) {
        (**self).on_cpu_slice(task, start, end)
    }
}

/// Fan out to two sinks, first `A` then `B`.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn on_event(&mut self, event: &SchedEvent) {
        self.0.on_event(event);
        self.1.on_event(event);
    }

    fn on_cpu_slice(&mut self, task: &TaskId, start: SimTime, end: SimTime) {
        self.0.on_cpu_slice(task, start, end);
        self.1.on_cpu_slice(task, start, end);
    }
}

/// Fan out to every sink in order.
impl<S: EventSink> EventSink for Vec<S> {
    fn on_event(&mut self, event: &SchedEvent) {
        for sink in self.iter_mut() {
            sink.on_event(event);
        }
    }

    fn on_cpu_slice(&mut self, task: &TaskId, start: SimTime, end: SimTime) {
        for sink in self.iter_mut() {
            sink.on_cpu_slice(task, start, end);
        }
    }
}
