//! Test fixtures shared by every simcfs crate.
//!
//! All builders panic on invalid input; they are for tests only.

use simcfs_types::{Burst, BurstKind, Nice, SimTime, Task, TaskDescriptor};

/// A CPU burst.
pub fn cpu(duration: SimTime) -> Burst {
    Burst::cpu(duration).expect("valid CPU burst")
}

/// An I/O burst.
pub fn io(duration: SimTime) -> Burst {
    Burst::io(duration).expect("valid IO burst")
}

/// Alternating CPU / I/O bursts starting with CPU, as in a task file line.
pub fn alternating(durations: &[SimTime]) -> Vec<Burst> {
    durations
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let kind = if i % 2 == 0 { BurstKind::Cpu } else { BurstKind::Io };
            Burst::new(kind, d).expect("valid burst")
        })
        .collect()
}

/// A validated task.
pub fn task(id: &str, arrival: SimTime, nice: i32, bursts: Vec<Burst>) -> Task {
    Task::new(id, arrival, Nice::new(nice).expect("valid nice"), bursts)
}

/// A single-CPU-burst task that has already accrued `vruntime`.
pub fn task_with_vruntime(id: &str, nice: i32, vruntime: f64) -> Task {
    let mut t = task(id, 0.0, nice, vec![cpu(100.0)]);
    t.add_vruntime(vruntime);
    t
}

/// A raw descriptor. Not validated, so it may describe bad input.
pub fn descriptor(id: &str, arrival: SimTime, nice: i32, bursts: Vec<Burst>) -> TaskDescriptor {
    TaskDescriptor::new(id, arrival, nice, bursts)
}

/// A raw descriptor with a single CPU burst.
pub fn cpu_only(id: &str, arrival: SimTime, nice: i32, duration: SimTime) -> TaskDescriptor {
    descriptor(id, arrival, nice, vec![cpu(duration)])
}

/// A burst that bypasses validation, for exercising input checks.
pub fn raw_burst(kind: BurstKind, duration: SimTime) -> Burst {
    Burst { kind, duration }
}
