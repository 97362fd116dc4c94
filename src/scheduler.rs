//! Reminder scheduling
//!
//! The scheduler keeps one timer per incomplete todo that is due in the future.
//! It never diffs timer sets: every new snapshot of the todo list cancels every pending timer and creates a fresh generation.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::NOTIFICATIONS_KEY;
use crate::notification::{deliver, Notification, Notifier};
use crate::storage::{load_json, save_json, KeyValueStore};
use crate::todo::{TodoId, TodoRecord};

/// Identifies a timer within the lifetime of a scheduler
pub type TimerId = u64;

/// Long sleeps are split into chunks of at most this duration
const MAX_SLEEP_CHUNK: Duration = Duration::from_secs(30 * 24 * 3600);

/// A reminder that is waiting for its due moment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimerEntry {
    timer_id: TimerId,
    todo_id: TodoId,
    fire_at: DateTime<Local>,
}

impl TimerEntry {
    pub fn timer_id(&self) -> TimerId           { self.timer_id }
    pub fn todo_id(&self) -> &TodoId            { &self.todo_id }
    pub fn fire_at(&self) -> &DateTime<Local>   { &self.fire_at }
}

struct PendingTimer {
    entry: TimerEntry,
    handle: JoinHandle<()>,
}

type PendingSet = BTreeMap<TimerId, PendingTimer>;


/// Schedules a best-effort notification for every incomplete todo that has a due moment in the future
pub struct NotificationScheduler {
    /// The latest todo list this scheduler has been given
    snapshot: Vec<TodoRecord>,
    /// Timers that have neither fired nor been cancelled yet.
    /// This is shared with the timer tasks, so that they can remove themselves when they fire
    pending: Arc<Mutex<PendingSet>>,
    next_timer_id: TimerId,

    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    /// How long a notification stays on screen
    notification_duration: Duration,
}

impl NotificationScheduler {
    /// Create a scheduler with an empty snapshot.
    ///
    /// The auto-dismiss duration is read from [`crate::config::NOTIFICATION_DURATION`]
    pub fn new(storage: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            snapshot: Vec::new(),
            pending: Arc::new(Mutex::new(BTreeMap::new())),
            next_timer_id: 1,
            storage,
            notifier,
            notification_duration: crate::config::notification_duration(),
        }
    }

    /// Override the auto-dismiss duration of the notifications
    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }

    pub fn notification_duration(&self) -> Duration {
        self.notification_duration
    }

    /// The todo list the current timers have been computed from
    pub fn snapshot(&self) -> &[TodoRecord] {
        &self.snapshot
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// The timers that are currently waiting, sorted by creation order
    pub fn pending_entries(&self) -> Vec<TimerEntry> {
        lock(&self.pending)
            .values()
            .map(|timer| timer.entry.clone())
            .collect()
    }

    /// Replace the snapshot without touching the timers.
    ///
    /// Used before [`Self::restore_on_startup`], which schedules the new snapshot itself.
    pub fn set_snapshot(&mut self, new_list: Vec<TodoRecord>) {
        self.snapshot = new_list;
    }

    /// Replace the snapshot, and reschedule everything
    pub fn update_todo_list(&mut self, new_list: Vec<TodoRecord>) {
        self.snapshot = new_list;
        self.schedule();
    }

    /// Cancel every pending timer, then create a timer for each incomplete todo whose due moment is still to come.
    ///
    /// Todos without a valid due moment, or with a moment in the past, are silently skipped.
    pub fn schedule(&mut self) {
        self.cancel_all();

        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                log::warn!("No async runtime is available, reminders will not be scheduled ({})", err);
                return;
            },
        };

        let now = Local::now();
        let mut pending = lock(&self.pending);
        for todo in &self.snapshot {
            if todo.completed() {
                continue;
            }
            let fire_at = match todo.due_datetime() {
                None => {
                    log::debug!("No valid due moment for {} ({:?} {:?})", todo.id(), todo.due_date(), todo.due_time());
                    continue;
                },
                Some(due) if due <= now => {
                    log::debug!("{} was due on {}, not scheduling it", todo.id(), due);
                    continue;
                },
                Some(due) => due,
            };
            let delay = (fire_at - now).to_std().unwrap_or_default();

            let timer_id = self.next_timer_id;
            self.next_timer_id += 1;

            let handle = runtime.spawn(fire_after(
                delay,
                timer_id,
                Notification::reminder(todo),
                Arc::clone(&self.pending),
                Arc::clone(&self.storage),
                Arc::clone(&self.notifier),
                self.notification_duration,
            ));
            log::debug!("Reminder {} for {} scheduled at {}", timer_id, todo.id(), fire_at);

            let entry = TimerEntry { timer_id, todo_id: todo.id().clone(), fire_at };
            pending.insert(timer_id, PendingTimer { entry, handle });
        }

        log::debug!("{} reminder(s) scheduled", pending.len());
        persist_timer_ids(&*self.storage, &pending);
    }

    /// Cancel every pending timer without firing it, and forget the persisted timer ids
    pub fn cancel_all(&self) {
        let mut pending = lock(&self.pending);
        for (_, timer) in std::mem::take(&mut *pending) {
            timer.handle.abort();
        }
        if let Err(err) = self.storage.remove(NOTIFICATIONS_KEY) {
            log::warn!("Unable to remove the persisted reminders: {}", err);
        }
    }

    /// Rebuild the timers after a restart.
    ///
    /// Timer ids persisted by a previous run do not refer to anything anymore. They are discarded, and the timers are computed again from the current snapshot.
    /// Returns the discarded ids.
    pub fn restore_on_startup(&mut self) -> Vec<TimerId> {
        let discarded = match load_json::<Vec<TimerId>>(&*self.storage, NOTIFICATIONS_KEY) {
            Ok(None) => Vec::new(),
            Ok(Some(ids)) => {
                log::debug!("Discarding {} reminder id(s) from a previous run", ids.len());
                ids
            },
            Err(err) => {
                log::warn!("Ignoring unreadable persisted reminders: {}", err);
                Vec::new()
            },
        };
        self.schedule();
        discarded
    }
}

impl Drop for NotificationScheduler {
    fn drop(&mut self) {
        for (_, timer) in std::mem::take(&mut *lock(&self.pending)) {
            timer.handle.abort();
        }
    }
}


async fn fire_after(
    delay: Duration,
    timer_id: TimerId,
    notification: Notification,
    pending: Arc<Mutex<PendingSet>>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    auto_dismiss: Duration,
) {
    let deadline = Instant::now() + delay;
    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        tokio::time::sleep((deadline - now).min(MAX_SLEEP_CHUNK)).await;
    }

    if take_fired_timer(&pending, &*storage, timer_id) == false {
        return;
    }
    log::info!("Reminder {} is due: {}", timer_id, notification.title);
    deliver(&*notifier, &notification, auto_dismiss).await;
}

/// Remove a timer that has just elapsed from the pending set.
///
/// Returns false if the timer has been cancelled in the meantime, in which case it must not fire.
fn take_fired_timer(pending: &Mutex<PendingSet>, storage: &dyn KeyValueStore, timer_id: TimerId) -> bool {
    let mut pending = lock(pending);
    if pending.remove(&timer_id).is_none() {
        log::debug!("Reminder {} has been superseded, not firing it", timer_id);
        return false;
    }
    persist_timer_ids(storage, &pending);
    true
}

fn persist_timer_ids(storage: &dyn KeyValueStore, pending: &PendingSet) {
    let ids: Vec<TimerId> = pending.keys().copied().collect();
    if let Err(err) = save_json(storage, NOTIFICATIONS_KEY, &ids) {
        log::warn!("Unable to persist the pending reminders: {}", err);
    }
}

fn lock(pending: &Mutex<PendingSet>) -> MutexGuard<'_, PendingSet> {
    match pending.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
