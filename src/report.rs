// Output sinks and table rendering for the front ends

use chrono::{Local, NaiveDate};
use colored::Colorize;
use std::io::{self, Write};

use crate::models::Task;

const INDEX_WIDTH: usize = 6;
const NAME_WIDTH: usize = 30;

/// Where the front ends send their output.
///
/// The task store never talks to a reporter; only the shell and the
/// subcommands do.
pub trait Reporter {
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
    fn info(&mut self, message: &str);
    fn heading(&mut self, message: &str);
    /// Text shown right before reading a line of input
    fn prompt(&mut self, message: &str);
    fn tasks(&mut self, rows: &[(usize, &Task)]);
}

/// Colored terminal output
pub struct TermReporter<W: Write> {
    out: W,
    today: NaiveDate,
}

impl TermReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TermReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            today: Local::now().date_naive(),
        }
    }

    fn emit(&mut self, text: &str, newline: bool) {
        let result = if newline {
            writeln!(self.out, "{}", text)
        } else {
            write!(self.out, "{}", text).and_then(|_| self.out.flush())
        };
        if let Err(e) = result {
            tracing::debug!(error = ?e, "Failed to write output");
        }
    }
}

impl<W: Write> Reporter for TermReporter<W> {
    fn success(&mut self, message: &str) {
        self.emit(&message.green().bold().to_string(), true);
    }

    fn error(&mut self, message: &str) {
        self.emit(&message.red().bold().to_string(), true);
    }

    fn info(&mut self, message: &str) {
        self.emit(message, true);
    }

    fn heading(&mut self, message: &str) {
        self.emit(&format!("\n{}", message.cyan().bold()), true);
    }

    fn prompt(&mut self, message: &str) {
        self.emit(message, false);
    }

    fn tasks(&mut self, rows: &[(usize, &Task)]) {
        let mut lines = render_table(rows, self.today).into_iter();
        if let Some(header) = lines.next() {
            self.emit(&header.blue().bold().to_string(), true);
        }
        for line in lines {
            self.emit(&line, true);
        }
    }
}

/// Render rows as fixed-width text lines, header first
pub fn render_table(rows: &[(usize, &Task)], today: NaiveDate) -> Vec<String> {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|(index, task)| {
            [
                index.to_string(),
                truncate(&task.name, NAME_WIDTH),
                capitalize(&task.priority),
                task.deadline.clone(),
                status(task, today).to_string(),
                task.category.clone(),
            ]
        })
        .collect();

    let header = ["Task #", "Task Name", "Priority", "Deadline", "Status", "Category"];
    let mut widths = [INDEX_WIDTH, NAME_WIDTH, 0, 0, 0, 0];
    for (col, title) in header.iter().enumerate().skip(2) {
        widths[col] = cells
            .iter()
            .map(|row| row[col].chars().count())
            .chain([title.chars().count()])
            .max()
            .unwrap_or(0);
    }

    let format_row = |row: &[&str]| {
        row.iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(&header[..])];
    for row in &cells {
        let row: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(format_row(row.as_slice()));
    }
    lines
}

/// Status text for a task, flagging pending tasks past their deadline
pub fn status(task: &Task, today: NaiveDate) -> &'static str {
    if task.completed {
        return "Completed";
    }
    match NaiveDate::parse_from_str(&task.deadline, "%Y-%m-%d") {
        Ok(deadline) if deadline < today => "Pending (overdue)",
        _ => "Pending",
    }
}

// "HIGH" -> "High"
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Reporter that records everything it is given, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn success(&mut self, message: &str) {
        self.lines.push(format!("ok: {}", message));
    }

    fn error(&mut self, message: &str) {
        self.lines.push(format!("error: {}", message));
    }

    fn info(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }

    fn heading(&mut self, message: &str) {
        self.lines.push(message.to_string());
    }

    fn prompt(&mut self, _message: &str) {}

    fn tasks(&mut self, rows: &[(usize, &Task)]) {
        for (index, task) in rows {
            self.lines.push(format!("#{} {}", index, task.name));
        }
    }
}
