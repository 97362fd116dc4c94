//! Some utility functions

use crate::formatter::TodoFormatter;
use crate::todo::TodoRecord;

/// Displayed instead of an empty table
pub const EMPTY_LIST_MESSAGE: &str = "No task found";

/// Render todos as a plain-text table, one todo per line
pub fn render_todo_list<'a, I>(todos: I, formatter: &TodoFormatter) -> String
where
    I: IntoIterator<Item = &'a TodoRecord>,
{
    let rows: Vec<[String; 5]> = todos.into_iter()
        .map(|todo| [
            formatter.format_task_label(todo.task()),
            formatter.format_due_date(todo.due_date()),
            formatter.format_due_time(todo.due_time()),
            formatter.format_status(todo.completed()).to_string(),
            todo.id().to_string(),
        ])
        .collect();

    if rows.is_empty() {
        return EMPTY_LIST_MESSAGE.to_string();
    }

    let header = ["Task", "Due date", "Due time", "Status", "Id"];
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_row(header.iter().copied(), &widths));
    for row in &rows {
        lines.push(render_row(row.iter().map(|s| s.as_str()), &widths));
    }
    lines.join("\n")
}

pub fn print_todo_list<'a, I>(todos: I, formatter: &TodoFormatter)
where
    I: IntoIterator<Item = &'a TodoRecord>,
{
    println!("{}", render_todo_list(todos, formatter));
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells.zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect();
    padded.join("  ").trim_end().to_string()
}
