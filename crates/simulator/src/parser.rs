//! Task file format.
//!
//! One task per line, whitespace separated:
//!
//! ```text
//! # id  arrival  nice  cpu  [io  cpu  io ...]
//! A     0        0     10
//! B     2.5      -5    1    8    1    8
//! ```
//!
//! Durations after the nice value alternate CPU and I/O, starting with CPU.
//! `#` starts a comment. Only syntax is checked here; value ranges are
//! checked by the engine when the run is created.

use simcfs_types::{Burst, BurstKind, TaskDescriptor};
use std::fmt::Write;
use thiserror::Error;

/// A task file could not be read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A task line is missing required fields.
    #[error("line {line}: expected `<id> <arrival> <nice> <cpu> [<io> <cpu> ...]`, found {found} field(s)")]
    MissingFields {
        /// 1-based line number.
        line: usize,
        /// Number of fields present.
        found: usize,
    },

    /// A numeric field did not parse.
    #[error("line {line}, column {column}: invalid {field} {token:?}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// 1-based character column of the token.
        column: usize,
        /// Which field was being read.
        field: &'static str,
        /// The offending text.
        token: String,
    },
}

/// Parse a whole task file.
pub fn parse_task_file(input: &str) -> Result<Vec<TaskDescriptor>, ParseError> {
    let mut tasks = Vec::new();
    for (i, raw) in input.lines().enumerate() {
        if let Some(task) = parse_line(i + 1, raw)? {
            tasks.push(task);
        }
    }
    Ok(tasks)
}

/// Parse one line. Blank and comment-only lines yield `None`.
fn parse_line(line: usize, raw: &str) -> Result<Option<TaskDescriptor>, ParseError> {
    let content = raw.split('#').next().unwrap_or_default();
    let fields = tokens(content);
    if fields.is_empty() {
        return Ok(None);
    }
    if fields.len() < 4 {
        return Err(ParseError::MissingFields {
            line,
            found: fields.len(),
        });
    }

    let number = |(column, token): (usize, &str), field: &'static str| {
        token.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
            line,
            column,
            field,
            token: token.to_string(),
        })
    };

    let id = fields[0].1;
    let arrival = number(fields[1], "arrival time")?;
    let (nice_col, nice_token) = fields[2];
    let nice = nice_token
        .parse::<i32>()
        .map_err(|_| ParseError::InvalidNumber {
            line,
            column: nice_col,
            field: "nice value",
            token: nice_token.to_string(),
        })?;

    let mut bursts = Vec::with_capacity(fields.len() - 3);
    for (i, &field) in fields[3..].iter().enumerate() {
        let kind = if i % 2 == 0 {
            BurstKind::Cpu
        } else {
            BurstKind::Io
        };
        let duration = number(field, "burst duration")?;
        bursts.push(Burst { kind, duration });
    }

    Ok(Some(TaskDescriptor::new(id, arrival, nice, bursts)))
}

/// Split on whitespace, keeping each token's 1-based character column.
fn tokens(line: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (column, (i, c)) in line.char_indices().enumerate() {
        match (c.is_whitespace(), start) {
            (true, Some((col, s))) => {
                out.push((col + 1, &line[s..i]));
                start = None;
            }
            (false, None) => start = Some((column, i)),
            _ => {}
        }
    }
    if let Some((col, s)) = start {
        out.push((col + 1, &line[s..]));
    }
    out
}

/// Render descriptors in task file format.
///
/// Bursts are written in order; the format itself implies alternation, so
/// tasks whose bursts do not alternate starting with CPU cannot be
/// represented faithfully and are written as if they did.
pub fn format_task_file(tasks: &[TaskDescriptor]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# id arrival nice cpu [io cpu ...]");
    for task in tasks {
        let _ = write!(out, "{} {} {}", task.id, task.arrival_time, task.nice);
        for burst in &task.bursts {
            let _ = write!(out, " {}", burst.duration);
        }
        out.push('\n');
    }
    out
}
