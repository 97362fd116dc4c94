//! Display helpers for todo fields
//!
//! These never alter stored values: records keep their raw text, and the formatting is applied when they are displayed.

/// Tasks longer than this (in characters) are truncated for display
pub const MAX_TASK_LABEL_CHARS: usize = 14;

const ELLIPSIS: &str = "...";

/// Maps raw todo fields to display strings
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TodoFormatter;

impl TodoFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Truncates long tasks to their first 14 characters, followed by an ellipsis
    pub fn format_task_label(&self, task: &str) -> String {
        match task.char_indices().nth(MAX_TASK_LABEL_CHARS) {
            None => task.to_string(),
            Some((cut, _)) => format!("{}{}", &task[..cut], ELLIPSIS),
        }
    }

    pub fn format_due_date(&self, due_date: &str) -> String {
        if due_date.is_empty() {
            String::from("No due date")
        } else {
            due_date.to_string()
        }
    }

    pub fn format_due_time(&self, due_time: &str) -> String {
        if due_time.is_empty() {
            String::from("No due Time")
        } else {
            due_time.to_string()
        }
    }

    pub fn format_status(&self, completed: bool) -> &'static str {
        match completed {
            true => "Completed",
            false => "Pending",
        }
    }
}
