use super::banner;
use indexmap::IndexMap;
use simcfs_core::{EventSink, SchedEvent};
use simcfs_types::{SimTime, TaskId};
use std::fmt::Write;

const DEFAULT_WIDTH: usize = 80;
const CELL: char = '█';

/// Collects CPU intervals and renders them as a text Gantt chart.
///
/// One row per task, in order of first dispatch, scaled so the whole run
/// fits in `width` cells. Every interval occupies at least one cell.
#[derive(Debug, Clone)]
pub struct GanttChart {
    rows: IndexMap<TaskId, Vec<(SimTime, SimTime)>>,
    width: usize,
}

impl Default for GanttChart {
    fn default() -> Self {
        Self::new()
    }
}

impl GanttChart {
    /// Empty chart, 80 cells wide.
    pub fn new() -> Self {
        Self {
            rows: IndexMap::new(),
            width: DEFAULT_WIDTH,
        }
    }

    /// Set the number of cells per row.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Number of tasks that ran.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// End of the last recorded interval.
    pub fn span(&self) -> SimTime {
        self.rows
            .values()
            .flatten()
            .map(|&(_, end)| end)
            .fold(0.0, f64::max)
    }

    /// Cells of one task's row.
    fn row_cells(&self, intervals: &[(SimTime, SimTime)], total: SimTime) -> String {
        let width = self.width;
        let mut cells = vec![' '; width];
        for &(start, end) in intervals {
            // Truncation matches the cell a time falls into.
            let from = ((start / total) * width as f64) as usize;
            let mut to = ((end / total) * width as f64) as usize;
            if to <= from {
                to = from + 1;
            }
            for cell in cells.iter_mut().take(to.min(width)).skip(from) {
                *cell = CELL;
            }
        }
        cells.into_iter().collect()
    }

    /// Render the chart.
    pub fn render(&self) -> String {
        let mut out = banner("GANTT CHART");
        if self.rows.is_empty() {
            out.push_str("No data.\n");
            return out;
        }

        let total = self.span().max(1.0);
        let label_width = self
            .rows
            .keys()
            .map(|id| id.as_str().chars().count())
            .max()
            .unwrap_or(0)
            .max(2);

        for (id, intervals) in &self.rows {
            let _ = writeln!(
                out,
                "Task {:<label_width$} |{}|",
                id.as_str(),
                self.row_cells(intervals, total)
            );
        }

        let gutter = " ".repeat(label_width + 6);
        let _ = writeln!(out, "{gutter}+{}+", "-".repeat(self.width));
        // The makespan lines up with the closing bar of the rows.
        let _ = writeln!(
            out,
            "{:<gutter_width$}0{:>ruler_width$}",
            "Time",
            format!("{total:.2}"),
            gutter_width = label_width + 6,
            ruler_width = self.width + 1
        );
        out
    }
}

impl EventSink for GanttChart {
    fn on_event(&mut self, _event: &SchedEvent) {}

    fn on_cpu_slice(&mut self, task: &TaskId, start: SimTime, end: SimTime) {
        self.rows
            .entry(task.clone())
            .or_default()
            .push((start, end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(slices: &[(&str, f64, f64)], width: usize) -> GanttChart {
        let mut chart = GanttChart::new().with_width(width);
        for &(id, start, end) in slices {
            chart.on_cpu_slice(&TaskId::from(id), start, end);
        }
        chart
    }

    #[test]
    fn test_empty_chart() {
        assert!(GanttChart::new().render().contains("No data."));
    }

    #[test]
    fn test_rows_scaled_to_width() {
        let chart = chart(&[("A", 0.0, 3.0), ("B", 3.0, 6.0), ("A", 6.0, 8.0), ("B", 8.0, 10.0)], 10);
        let text = chart.render();
        assert!(text.contains("Task A  |███   ██  |"), "{text}");
        assert!(text.contains("Task B  |   ███  ██|"), "{text}");
        assert_eq!(chart.rows(), 2);
        assert_eq!(chart.span(), 10.0);
    }

    #[test]
    fn test_short_interval_gets_a_cell() {
        let chart = chart(&[("A", 0.0, 100.0), ("B", 50.0, 50.1)], 10);
        let text = chart.render();
        assert!(text.contains("Task B  |     █    |"), "{text}");
    }

    #[test]
    fn test_rows_in_first_dispatch_order() {
        let text = chart(&[("zeta", 0.0, 1.0), ("alpha", 1.0, 2.0)], 4).render();
        let zeta = text.find("Task zeta").unwrap();
        let alpha = text.find("Task alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_ruler_ends_with_makespan() {
        let text = chart(&[("A", 0.0, 20.0)], 20).render();
        let ruler = text.lines().last().unwrap();
        assert!(ruler.starts_with("Time    0"));
        assert!(ruler.ends_with("20.00"));
        let axis = text.lines().rev().nth(1).unwrap();
        assert_eq!(axis.trim_start(), format!("+{}+", "-".repeat(20)));
    }
}
