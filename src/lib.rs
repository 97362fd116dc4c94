//! This crate provides a local todo list, that reminds its user about the todos that are due.
//!
//! The todo list itself is handled by the [`store`] module. Every change to it is persisted to a key-value [`storage`], and handed to the reminder [`scheduler`].
//!
//! The scheduler keeps one timer per incomplete todo that is due in the future, and displays a desktop [`notification`] when a timer elapses. \
//! Notifications are best-effort: they depend on the capabilities and permissions of the host, and timers do not survive the process (they are rebuilt on startup instead).
//!
//! [`TodoApp`](app::TodoApp) wires everything together.

pub mod config;
pub mod formatter;
pub use formatter::TodoFormatter;
pub mod todo;
pub use todo::{TodoId, TodoRecord};

pub mod storage;
pub mod notification;
pub mod scheduler;
pub use scheduler::NotificationScheduler;
pub mod store;
pub use store::{TodoFilter, TodoStore};
pub mod theme;

pub mod app;
pub use app::TodoApp;

pub mod utils;
