//! End-to-end runs of the scheduler simulation.

use simcfs_core::{EventKind, RecordingSink};
use simcfs_fair::{FairnessCalculator, SchedulerConfig};
use simcfs_simulation::{EngineConfig, SimulationError, SimulationOutcome, SimulationRunner};
use simcfs_test_helpers::{alternating, cpu_only, descriptor};
use simcfs_types::{nice_to_weight, TaskDescriptor, TaskId};

fn simulate(descriptors: Vec<TaskDescriptor>) -> (SimulationOutcome, RecordingSink) {
    let mut sink = RecordingSink::new();
    let outcome = SimulationRunner::new(EngineConfig::default(), descriptors)
        .unwrap()
        .run(&mut sink)
        .unwrap();
    (outcome, sink)
}

fn id(s: &str) -> TaskId {
    TaskId::from(s)
}

#[test]
fn test_two_equal_tasks_alternate_in_half_period_slices() {
    let (outcome, sink) = simulate(vec![cpu_only("A", 0.0, 0, 10.0), cpu_only("B", 0.0, 0, 10.0)]);

    let order: Vec<String> = sink
        .dispatch_order()
        .iter()
        .map(|t| t.as_str().to_string())
        .collect();
    assert_eq!(order, vec!["A", "B", "A", "B", "A", "B", "A", "B"]);

    let durations: Vec<f64> = sink.slices().iter().map(|s| s.duration()).collect();
    assert_eq!(durations, vec![3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 1.0, 1.0]);

    let a = outcome.metrics_for(&id("A")).unwrap();
    let b = outcome.metrics_for(&id("B")).unwrap();
    assert_eq!(a.end, 19.0);
    assert_eq!(b.end, 20.0);
    assert!(a.end >= 10.0 && b.end >= 10.0);
    assert_eq!(a.final_vruntime, 10.0);
    assert_eq!(b.final_vruntime, 10.0);
    assert_eq!(outcome.summary.stats.preemptions, 6);
    assert_eq!(outcome.summary.stats.context_switches, 8);
}

#[test]
fn test_lone_io_task_is_never_preempted() {
    let (outcome, sink) = simulate(vec![descriptor(
        "A",
        0.0,
        0,
        alternating(&[1.0, 8.0, 1.0, 8.0]),
    )]);

    assert_eq!(outcome.makespan(), 18.0);
    let a = outcome.metrics_for(&id("A")).unwrap();
    assert_eq!(a.waiting, 0.0);
    assert_eq!(a.response, 0.0);
    assert_eq!(sink.count(EventKind::Preempt), 0);
    assert_eq!(sink.count(EventKind::IoStart), 2);
    assert!((outcome.summary.cpu_utilization - 2.0 / 18.0).abs() < 1e-12);
}

#[test]
fn test_lower_nice_gets_more_cpu() {
    let (outcome, sink) = simulate(vec![cpu_only("A", 0.0, 0, 100.0), cpu_only("B", 0.0, -5, 100.0)]);

    let calc = FairnessCalculator::new(SchedulerConfig::default());
    assert!(
        calc.vruntime_delta(nice_to_weight(-5).unwrap(), 1.0)
            < calc.vruntime_delta(nice_to_weight(0).unwrap(), 1.0)
    );

    let window = 30.0;
    let cpu_in_window = |task: &str| -> f64 {
        sink.slices_for(&id(task))
            .filter(|s| s.end <= window)
            .map(|s| s.duration())
            .sum()
    };
    let a_cpu = cpu_in_window("A");
    let b_cpu = cpu_in_window("B");
    assert!(b_cpu > 2.0 * a_cpu, "A={a_cpu} B={b_cpu}");

    let a = outcome.metrics_for(&id("A")).unwrap();
    let b = outcome.metrics_for(&id("B")).unwrap();
    assert!(b.end < a.end);
}

#[test]
fn test_cpu_time_is_conserved() {
    let (outcome, _) = simulate(vec![
        descriptor("io-heavy", 0.0, 3, alternating(&[0.5, 7.0, 0.25, 3.0, 2.0])),
        cpu_only("hog", 0.0, -10, 37.3),
        descriptor("mixed", 1.5, 0, alternating(&[4.0, 1.0, 4.0, 1.0, 4.0])),
        cpu_only("late", 22.0, 19, 0.1),
        descriptor("short", 2.25, -20, alternating(&[0.3, 0.3, 0.3])),
    ]);

    let demand: f64 = outcome.tasks.iter().map(|t| t.cpu_demand()).sum();
    let consumed: f64 = outcome.tasks.iter().map(|t| t.cumulative_exec_time()).sum();
    assert!((demand - consumed).abs() < 1e-9, "{demand} vs {consumed}");
    assert!((outcome.summary.total_cpu - demand).abs() < 1e-9);
    assert!(outcome.summary.cpu_utilization <= 1.0 + 1e-12);
    assert_eq!(outcome.tasks.len(), 5);
    assert!(outcome.tasks.iter().all(|t| t.end_time().is_some()));
}

#[test]
fn test_simultaneous_equal_tasks_run_in_input_order() {
    let (_, sink) = simulate(vec![
        cpu_only("C", 0.0, 0, 1.0),
        cpu_only("A", 0.0, 0, 1.0),
        cpu_only("B", 0.0, 0, 1.0),
    ]);
    let order: Vec<String> = sink
        .dispatch_order()
        .iter()
        .map(|t| t.as_str().to_string())
        .collect();
    assert_eq!(order, vec!["C", "A", "B"]);
}

#[test]
fn test_at_most_one_task_on_cpu() {
    let (_, sink) = simulate(vec![
        descriptor("A", 0.0, 0, alternating(&[5.0, 2.0, 5.0])),
        descriptor("B", 1.0, 5, alternating(&[3.0, 1.0, 3.0])),
        cpu_only("C", 2.0, -3, 9.0),
    ]);
    let slices = sink.slices();
    for pair in slices.windows(2) {
        assert!(pair[0].end <= pair[1].start + 1e-12);
    }
}

#[test]
fn test_every_event_is_timestamped_monotonically() {
    let (_, sink) = simulate(vec![
        descriptor("A", 0.0, 0, alternating(&[2.0, 2.0, 2.0])),
        cpu_only("B", 0.5, 0, 4.0),
    ]);
    let events = sink.events();
    assert_eq!(events.first().map(|e| e.kind), Some(EventKind::RunStart));
    assert_eq!(events.last().map(|e| e.kind), Some(EventKind::RunEnd));
    assert!(events.windows(2).all(|w| w[0].time <= w[1].time));
}

#[test]
fn test_validation_failure_runs_nothing() {
    let err = SimulationRunner::new(
        EngineConfig::default(),
        vec![cpu_only("A", 0.0, 0, 1.0), cpu_only("A", 0.0, 0, 1.0)],
    )
    .err();
    assert!(matches!(err, Some(SimulationError::Validation(_))));
}

#[test]
fn test_event_budget_stops_long_runs() {
    let config = EngineConfig::default().with_max_events(10);
    let err = SimulationRunner::new(config, vec![cpu_only("A", 0.0, 0, 1_000.0)])
        .unwrap()
        .run(&mut RecordingSink::new())
        .unwrap_err();
    assert!(matches!(err, SimulationError::EventBudgetExhausted { limit: 10, .. }));
    assert!(err.to_string().contains("10"));
}
