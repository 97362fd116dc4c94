//! Desktop notifications
//!
//! The host notification capability is abstracted behind the [`Notifier`] trait.
//! [`deliver`] implements the best-effort policy used when a reminder is due.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::todo::TodoRecord;

/// Whether the user allowed this application to display notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The user has not been asked yet
    Default,
}

/// A notification that is about to be displayed
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: String, body: String) -> Self {
        Self { title, body }
    }

    /// The reminder for a todo that is due
    pub fn reminder(todo: &TodoRecord) -> Self {
        Self {
            title: format!("Reminder: {}", todo.task()),
            body: format!("Task due on {} at {}", todo.due_date(), todo.due_time()),
        }
    }
}

/// The notification capability of the host
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Whether this host is able to display notifications at all
    fn is_supported(&self) -> bool;
    /// The current permission state
    fn permission(&self) -> Permission;
    /// Ask the user for the permission to display notifications
    async fn request_permission(&self) -> Permission;
    /// Display a notification, that should be dismissed after `auto_dismiss`
    async fn show(&self, notification: &Notification, auto_dismiss: Duration);
    /// A generic, blocking-free alert, used when notifications are not supported
    fn alert(&self, message: &str);
}

/// Message shown when the host cannot display notifications
pub const UNSUPPORTED_MESSAGE: &str = "This system does not support desktop notification";

/// Display a notification if the host allows it.
///
/// Returns whether the notification has been shown. There is no retry: a dropped notification is dropped for good.
pub async fn deliver(notifier: &dyn Notifier, notification: &Notification, auto_dismiss: Duration) -> bool {
    if notifier.is_supported() == false {
        notifier.alert(UNSUPPORTED_MESSAGE);
        return false;
    }

    match notifier.permission() {
        Permission::Granted => {},
        Permission::Denied => {
            log::debug!("Notifications are denied, dropping {:?}", notification.title);
            return false;
        },
        Permission::Default => {
            log::debug!("Requesting the permission to display notifications");
            if notifier.request_permission().await != Permission::Granted {
                log::info!("Notification permission not granted, dropping {:?}", notification.title);
                return false;
            }
        },
    }

    notifier.show(notification, auto_dismiss).await;
    true
}



/// A notifier that writes reminders to the log
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn is_supported(&self) -> bool {
        true
    }

    fn permission(&self) -> Permission {
        Permission::Granted
    }

    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn show(&self, notification: &Notification, auto_dismiss: Duration) {
        log::info!("{} -- {} (dismissed after {:?})", notification.title, notification.body, auto_dismiss);
    }

    fn alert(&self, message: &str) {
        log::warn!("{}", message);
    }
}



/// A notifier that displays native desktop notifications
///
/// If a notification cannot be displayed (e.g. no notification daemon is running), the reminder is printed as an alert instead.
#[derive(Clone, Debug)]
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: &str) -> Self {
        Self { app_name: app_name.to_string() }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new("todo")
    }
}

/// The notification timeout matching an auto-dismiss duration
fn dismiss_timeout(auto_dismiss: Duration) -> notify_rust::Timeout {
    let millis = auto_dismiss.as_millis().min(u32::MAX as u128) as u32;
    notify_rust::Timeout::Milliseconds(millis)
}

#[async_trait]
impl Notifier for DesktopNotifier {
    fn is_supported(&self) -> bool {
        true
    }

    /// Desktop notifications do not require any permission
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn show(&self, notification: &Notification, auto_dismiss: Duration) {
        let summary = notification.title.clone();
        let body = notification.body.clone();
        let app_name = self.app_name.clone();
        let timeout = dismiss_timeout(auto_dismiss);

        // Talking to the notification daemon is blocking
        let shown = tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .summary(&summary)
                .body(&body)
                .appname(&app_name)
                .timeout(timeout)
                .show()
                .map(|_| ())
                .map_err(|err| err.to_string())
        }).await;

        let err = match shown {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err,
            Err(join_err) => join_err.to_string(),
        };
        log::warn!("Unable to display a desktop notification: {}", err);
        self.alert(&format!("{} -- {}", notification.title, notification.body));
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}



/// A notifier that keeps everything it is asked to display in memory
///
/// Its capability and permission answers can be tweaked, which makes it suitable for tests and headless use.
#[derive(Debug)]
pub struct MemoryNotifier {
    supported: bool,
    state: Mutex<MemoryNotifierState>,
}

#[derive(Debug)]
struct MemoryNotifierState {
    permission: Permission,
    /// What the user answers when asked for the permission
    answer: Permission,
    permission_requests: u32,
    shown: Vec<Notification>,
    alerts: Vec<String>,
}

impl MemoryNotifier {
    /// A notifier that is supported and already granted
    pub fn new() -> Self {
        Self::with_permission(Permission::Granted)
    }

    pub fn with_permission(permission: Permission) -> Self {
        Self {
            supported: true,
            state: Mutex::new(MemoryNotifierState {
                permission,
                answer: Permission::Granted,
                permission_requests: 0,
                shown: Vec::new(),
                alerts: Vec::new(),
            }),
        }
    }

    /// A notifier for hosts that cannot display notifications
    pub fn unsupported() -> Self {
        let mut notifier = Self::with_permission(Permission::Default);
        notifier.supported = false;
        notifier
    }

    /// Set what the user will answer to the next permission requests
    pub fn answer_requests_with(self, answer: Permission) -> Self {
        self.lock().answer = answer;
        self
    }

    pub fn shown(&self) -> Vec<Notification> {
        self.lock().shown.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.lock().alerts.clone()
    }

    pub fn permission_requests(&self) -> u32 {
        self.lock().permission_requests
    }

    fn lock(&self) -> MutexGuard<'_, MemoryNotifierState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for MemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn permission(&self) -> Permission {
        self.lock().permission
    }

    async fn request_permission(&self) -> Permission {
        let mut state = self.lock();
        state.permission_requests += 1;
        state.permission = state.answer;
        state.permission
    }

    async fn show(&self, notification: &Notification, _auto_dismiss: Duration) {
        self.lock().shown.push(notification.clone());
    }

    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn reminder() -> Notification {
        let todo = TodoRecord::new("Buy milk".to_string(), "2099-01-01".to_string(), "10:00".to_string());
        Notification::reminder(&todo)
    }

    #[test]
    fn reminder_content() {
        let n = reminder();
        assert_eq!(n.title, "Reminder: Buy milk");
        assert_eq!(n.body, "Task due on 2099-01-01 at 10:00");
    }

    #[tokio::test]
    async fn granted_is_shown() {
        let notifier = MemoryNotifier::new();
        assert!(deliver(&notifier, &reminder(), Duration::from_secs(10)).await);
        assert_eq!(notifier.shown(), vec![reminder()]);
        assert_eq!(notifier.permission_requests(), 0);
    }

    #[tokio::test]
    async fn denied_is_dropped() {
        let notifier = MemoryNotifier::with_permission(Permission::Denied);
        assert!(deliver(&notifier, &reminder(), Duration::from_secs(10)).await == false);
        assert!(notifier.shown().is_empty());
        assert_eq!(notifier.permission_requests(), 0);
    }

    #[tokio::test]
    async fn undetermined_asks_first() {
        let notifier = MemoryNotifier::with_permission(Permission::Default);
        assert!(deliver(&notifier, &reminder(), Duration::from_secs(10)).await);
        assert_eq!(notifier.permission_requests(), 1);
        assert_eq!(notifier.shown().len(), 1);

        // Once granted, the user is not asked again
        assert!(deliver(&notifier, &reminder(), Duration::from_secs(10)).await);
        assert_eq!(notifier.permission_requests(), 1);

        let refusing = MemoryNotifier::with_permission(Permission::Default)
            .answer_requests_with(Permission::Denied);
        assert!(deliver(&refusing, &reminder(), Duration::from_secs(10)).await == false);
        assert_eq!(refusing.permission_requests(), 1);
        assert!(refusing.shown().is_empty());
    }

    #[test]
    fn desktop_timeout_follows_auto_dismiss() {
        assert!(matches!(dismiss_timeout(Duration::from_secs(10)), notify_rust::Timeout::Milliseconds(10_000)));
        assert!(matches!(dismiss_timeout(Duration::from_millis(250)), notify_rust::Timeout::Milliseconds(250)));
        let huge = Duration::from_secs(u64::MAX / 2);
        assert!(matches!(dismiss_timeout(huge), notify_rust::Timeout::Milliseconds(u32::MAX)));
    }

    #[test]
    fn desktop_notifier_needs_no_permission() {
        let notifier = DesktopNotifier::default();
        assert!(notifier.is_supported());
        assert_eq!(notifier.permission(), Permission::Granted);
    }

    #[tokio::test]
    async fn unsupported_alerts() {
        let notifier = MemoryNotifier::unsupported();
        assert!(deliver(&notifier, &reminder(), Duration::from_secs(10)).await == false);
        assert!(notifier.shown().is_empty());
        assert_eq!(notifier.alerts(), vec![UNSUPPORTED_MESSAGE.to_string()]);
    }
}
