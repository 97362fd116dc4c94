//! Wires the formatter, the reminder scheduler and the todo store together

use std::sync::Arc;

use crate::formatter::TodoFormatter;
use crate::notification::Notifier;
use crate::scheduler::NotificationScheduler;
use crate::storage::KeyValueStore;
use crate::store::TodoStore;
use crate::theme::ThemeSettings;

/// A todo list with reminders, backed by a given storage and notifier
pub struct TodoApp {
    formatter: TodoFormatter,
    store: TodoStore,
    theme: ThemeSettings,
}

impl TodoApp {
    /// Load the persisted todo list and schedule its reminders.
    ///
    /// Reminders are only scheduled when this is called from within a tokio runtime.
    pub fn open(storage: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        let formatter = TodoFormatter::new();
        let scheduler = NotificationScheduler::new(Arc::clone(&storage), notifier);
        let store = TodoStore::load(Arc::clone(&storage), scheduler);
        let theme = ThemeSettings::new(storage);
        Self { formatter, store, theme }
    }

    pub fn formatter(&self) -> &TodoFormatter { &self.formatter }
    pub fn store(&self) -> &TodoStore         { &self.store     }
    pub fn store_mut(&mut self) -> &mut TodoStore { &mut self.store }
    pub fn theme(&self) -> &ThemeSettings     { &self.theme     }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::MemoryNotifier;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn reopen_keeps_todos_and_reminders() {
        let storage = Arc::new(MemoryStorage::new());

        let mut app = TodoApp::open(storage.clone(), Arc::new(MemoryNotifier::new()));
        let todo = app.store_mut().add("X", "", "");
        app.store_mut().add("Buy milk", "2099-01-01", "10:00");
        app.theme().set_theme("cupcake").unwrap();
        assert_eq!(app.formatter().format_due_date(todo.due_date()), "No due date");
        assert_eq!(app.formatter().format_due_time(todo.due_time()), "No due Time");
        drop(app);

        let app = TodoApp::open(storage, Arc::new(MemoryNotifier::new()));
        assert_eq!(app.store().len(), 2);
        assert_eq!(app.store().scheduler().pending_count(), 1);
        assert_eq!(app.theme().theme().as_deref(), Some("cupcake"));
    }
}
