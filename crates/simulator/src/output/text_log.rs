use simcfs_core::{EventSink, SchedEvent};
use std::io::{self, Write};

/// Width of the task column, so lines without a task stay aligned.
const TASK_COLUMN: usize = 36;

/// Writes one aligned line per scheduler event.
///
/// ```text
/// [   3.00] DISPATCH   | Task B   (nice:  0, vruntime   0.00) | slice 3.00
/// ```
///
/// Lines are also kept in memory. The first write error is remembered and
/// further output is dropped; it is reported by [`TextLog::finish`].
#[derive(Debug)]
pub struct TextLog<W: Write> {
    out: W,
    history: Vec<String>,
    error: Option<io::Error>,
}

impl<W: Write> TextLog<W> {
    /// Log to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            history: Vec::new(),
            error: None,
        }
    }

    /// Every line written so far.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Flush and hand back the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    /// Format one event.
    pub fn format_event(event: &SchedEvent) -> String {
        let task = match &event.task {
            Some(t) => format!(
                "Task {:<3} (nice: {:>2}, vruntime {:>6.2})",
                t.id.as_str(),
                t.nice.get(),
                t.vruntime
            ),
            None => String::new(),
        };
        let line = format!(
            "[{:>7.2}] {:<10} | {:<width$} | {}",
            event.time,
            event.kind.label(),
            task,
            event.note.as_deref().unwrap_or(""),
            width = TASK_COLUMN
        );
        line.trim_end().to_string()
    }
}

impl<W: Write> EventSink for TextLog<W> {
    fn on_event(&mut self, event: &SchedEvent) {
        let line = Self::format_event(event);
        if self.error.is_none() {
            if let Err(err) = writeln!(self.out, "{line}") {
                self.error = Some(err);
            }
        }
        self.history.push(line);
    }
}
