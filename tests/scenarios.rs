//! End-to-end scenarios, going through the public API only

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;

use todo_reminders::config::{NOTIFICATIONS_KEY, TODOS_KEY};
use todo_reminders::notification::{MemoryNotifier, Permission, UNSUPPORTED_MESSAGE};
use todo_reminders::storage::{FolderStorage, KeyValueStore, MemoryStorage};
use todo_reminders::{NotificationScheduler, TodoApp, TodoFormatter, TodoStore};

fn due_in(delay: chrono::Duration) -> (String, String) {
    let due = Local::now() + delay;
    (due.format("%Y-%m-%d").to_string(), due.format("%H:%M:%S").to_string())
}

#[tokio::test]
async fn buy_milk() {
    let _ = env_logger::builder().is_test(true).try_init();

    let storage = Arc::new(MemoryStorage::new());
    let mut app = TodoApp::open(storage.clone(), Arc::new(MemoryNotifier::new()));
    app.store_mut().add("Buy milk", "2099-01-01", "10:00");

    let all: Vec<_> = app.store().filter("all").collect();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].task(), "Buy milk");
    assert_eq!(all[0].due_date(), "2099-01-01");
    assert_eq!(all[0].due_time(), "10:00");
    assert!(all[0].completed() == false);

    let raw = storage.get(TODOS_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["dueDate"], "2099-01-01");
    assert_eq!(json[0]["completed"], false);
}

#[test]
fn no_due_date() {
    let storage = Arc::new(MemoryStorage::new());
    let scheduler = NotificationScheduler::new(storage.clone(), Arc::new(MemoryNotifier::new()));
    let mut store = TodoStore::new(storage, scheduler);
    let todo = store.add("X", "", "");

    let formatter = TodoFormatter::new();
    assert_eq!(formatter.format_due_date(todo.due_date()), "No due date");
    assert_eq!(formatter.format_due_time(todo.due_time()), "No due Time");
    assert_eq!(formatter.format_status(todo.completed()), "Pending");
}

#[tokio::test]
async fn one_hour_ahead_then_cleared() {
    let storage = Arc::new(MemoryStorage::new());
    let mut scheduler = NotificationScheduler::new(storage.clone(), Arc::new(MemoryNotifier::new()));
    let (date, time) = due_in(chrono::Duration::hours(1));
    let todo = todo_reminders::TodoRecord::new("Stand-up".to_string(), date, time);

    scheduler.update_todo_list(vec![todo]);
    assert_eq!(scheduler.pending_count(), 1);

    scheduler.update_todo_list(Vec::new());
    assert_eq!(scheduler.pending_count(), 0);
}

#[tokio::test]
async fn completed_todos_are_never_scheduled() {
    let storage = Arc::new(MemoryStorage::new());
    let mut app = TodoApp::open(storage, Arc::new(MemoryNotifier::new()));
    let (date, time) = due_in(chrono::Duration::hours(3));
    let todo = app.store_mut().add("Already done", &date, &time);
    assert_eq!(app.store().scheduler().pending_count(), 1);

    app.store_mut().toggle_completion(todo.id());
    assert_eq!(app.store().scheduler().pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn reminder_is_delivered_after_asking_permission() {
    let notifier = Arc::new(MemoryNotifier::with_permission(Permission::Default));
    let mut app = TodoApp::open(Arc::new(MemoryStorage::new()), notifier.clone());
    let (date, time) = due_in(chrono::Duration::minutes(30));
    app.store_mut().add("Take the cake out of the oven", &date, &time);

    tokio::time::sleep(Duration::from_secs(31 * 60)).await;
    tokio::task::yield_now().await;

    assert_eq!(notifier.permission_requests(), 1);
    let shown = notifier.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Reminder: Take the cake out of the oven");
    assert_eq!(shown[0].body, format!("Task due on {} at {}", date, time));
    assert_eq!(app.store().scheduler().pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn unsupported_host_gets_an_alert() {
    let notifier = Arc::new(MemoryNotifier::unsupported());
    let mut app = TodoApp::open(Arc::new(MemoryStorage::new()), notifier.clone());
    let (date, time) = due_in(chrono::Duration::minutes(1));
    app.store_mut().add("Stretch", &date, &time);

    tokio::time::sleep(Duration::from_secs(120)).await;
    tokio::task::yield_now().await;

    assert!(notifier.shown().is_empty());
    assert_eq!(notifier.alerts(), vec![UNSUPPORTED_MESSAGE.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn edits_supersede_previous_timers() {
    let notifier = Arc::new(MemoryNotifier::new());
    let mut app = TodoApp::open(Arc::new(MemoryStorage::new()), notifier.clone());
    let (date, time) = due_in(chrono::Duration::minutes(10));
    let todo = app.store_mut().add("Draft", &date, &time);
    app.store_mut().edit(todo.id(), "Final");
    app.store_mut().add("Unrelated", "", "");

    tokio::time::sleep(Duration::from_secs(11 * 60)).await;
    tokio::task::yield_now().await;

    let shown = notifier.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Reminder: Final");
}

#[tokio::test]
async fn folder_storage_survives_a_restart() {
    let folder = std::env::temp_dir().join(format!("todo-reminders-restart-{}", uuid::Uuid::new_v4()));

    {
        let storage = Arc::new(FolderStorage::new(&folder));
        let mut app = TodoApp::open(storage, Arc::new(MemoryNotifier::new()));
        let (date, time) = due_in(chrono::Duration::days(2));
        app.store_mut().add("Renew passport", &date, &time);
        let done = app.store_mut().add("Book flights", "", "");
        app.store_mut().toggle_completion(done.id());
    }

    let storage = Arc::new(FolderStorage::new(&folder));
    assert!(storage.get(NOTIFICATIONS_KEY).unwrap().is_some());
    let app = TodoApp::open(storage, Arc::new(MemoryNotifier::new()));
    assert_eq!(app.store().filter("pending").count(), 1);
    assert_eq!(app.store().filter("completed").count(), 1);
    assert_eq!(app.store().scheduler().pending_count(), 1);

    let _ = std::fs::remove_dir_all(&folder);
}
