//! Human-readable renderings of a run.

mod gantt;
mod summary;
mod text_log;

pub use gantt::GanttChart;
pub use summary::render_summary;
pub use text_log::TextLog;

/// Width of the full-width rules framing each section.
pub(crate) const RULE_WIDTH: usize = 100;

/// A centered section header framed by rules.
pub(crate) fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{title:^width$}\n{rule}\n", width = RULE_WIDTH)
}
