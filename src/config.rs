//! Support for library configuration options

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;

/// Storage key of the serialized todo list
pub const TODOS_KEY: &str = "todos";
/// Storage key of the active visual theme
pub const THEME_KEY: &str = "theme";
/// Storage key of the pending reminder timer ids
pub const NOTIFICATIONS_KEY: &str = "notifications";

/// How long a reminder notification stays on screen before it is dismissed.
/// Feel free to override it when initing this library.
pub static NOTIFICATION_DURATION: Lazy<Arc<Mutex<Duration>>> = Lazy::new(|| Arc::new(Mutex::new(Duration::from_secs(10))));

/// The folder the command-line front-end stores its data in, unless told otherwise.
/// Feel free to override it when initing this library.
pub static STORAGE_FOLDER: Lazy<Arc<Mutex<PathBuf>>> = Lazy::new(|| Arc::new(Mutex::new(PathBuf::from("todo-storage"))));

/// The current auto-dismiss duration of reminder notifications
pub fn notification_duration() -> Duration {
    match NOTIFICATION_DURATION.lock() {
        Ok(duration) => *duration,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// The current default storage folder
pub fn storage_folder() -> PathBuf {
    match STORAGE_FOLDER.lock() {
        Ok(folder) => folder.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
