use super::{banner, RULE_WIDTH};
use simcfs_simulation::SimulationOutcome;
use std::fmt::Write;

/// Render the per-task metrics table and run averages.
pub fn render_summary(outcome: &SimulationOutcome) -> String {
    let mut out = banner("SIMULATION FINISHED - STATS");
    if outcome.metrics.is_empty() {
        out.push_str("No task to show.\n");
        return out;
    }

    let id_width = outcome
        .metrics
        .iter()
        .map(|m| m.id.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let _ = writeln!(
        out,
        "| {:<id_width$} | {:>5} | {:>7} | {:>9} | {:>8} | {:>10} | {:>9} | {:>9} | {:>9} |",
        "ID", "Nice", "Arrival", "End", "Response", "Turnaround", "Waiting", "CPU Tot", "IO Tot"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for m in &outcome.metrics {
        let _ = writeln!(
            out,
            "| {:<id_width$} | {:>5} | {:>7.2} | {:>9.2} | {:>8.2} | {:>10.2} | {:>9.2} | {:>9.2} | {:>9.2} |",
            m.id.as_str(),
            m.nice.get(),
            m.arrival,
            m.end,
            m.response,
            m.turnaround,
            m.waiting,
            m.cpu_demand,
            m.io_demand
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    let s = &outcome.summary;
    let _ = writeln!(out, "Makespan             : {:.2}", s.makespan);
    let _ = writeln!(out, "Average Turnaround   : {:.2}", s.avg_turnaround);
    let _ = writeln!(out, "Average Waiting Time : {:.2}", s.avg_waiting);
    let _ = writeln!(out, "Average Response     : {:.2}", s.avg_response);
    let _ = writeln!(out, "CPU Utilization      : {:.2} %", s.cpu_utilization * 100.0);
    let _ = writeln!(
        out,
        "Dispatches           : {} ({} preemptions, {} context switches)",
        s.stats.dispatches, s.stats.preemptions, s.stats.context_switches
    );
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    out
}
