//! To-do records

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};


/// An opaque, randomly generated todo identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId {
    content: String,
}

impl TodoId {
    /// Generate a random TodoId.
    ///
    /// Collisions are considered negligible, no check is performed against existing ids
    pub fn random() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for TodoId {
    fn from(content: String) -> Self {
        Self { content }
    }
}

impl From<&str> for TodoId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for TodoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}


/// A to-do item, as it is persisted
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    id: TodoId,
    /// The raw task text, never truncated
    task: String,
    /// Free-form due date, empty when unset
    #[serde(default)]
    due_date: String,
    /// Free-form due time, empty when unset
    #[serde(default)]
    due_time: String,
    #[serde(default)]
    completed: bool,
}

impl TodoRecord {
    /// Create a brand new, uncompleted record.
    /// This will pick a new (random) id.
    pub fn new(task: String, due_date: String, due_time: String) -> Self {
        Self::new_with_parameters(TodoId::random(), task, due_date, due_time, false)
    }

    pub fn new_with_parameters(id: TodoId, task: String, due_date: String, due_time: String, completed: bool) -> Self {
        Self { id, task, due_date, due_time, completed }
    }

    pub fn id(&self) -> &TodoId       { &self.id       }
    pub fn task(&self) -> &str        { &self.task     }
    pub fn due_date(&self) -> &str    { &self.due_date }
    pub fn due_time(&self) -> &str    { &self.due_time }
    pub fn completed(&self) -> bool   { self.completed }

    pub fn set_task(&mut self, new_task: String) {
        self.task = new_task;
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// The local moment this todo is due, if its date and time can be understood
    pub fn due_datetime(&self) -> Option<DateTime<Local>> {
        parse_due_datetime(&self.due_date, &self.due_time)
    }
}


const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse `"<date> <time>"` as a local moment.
///
/// When there is no time, the date may also hold a full moment, such as `2099-01-01T10:00`. A date alone means local midnight.
/// An empty or unrecognized date returns `None`.
pub fn parse_due_datetime(due_date: &str, due_time: &str) -> Option<DateTime<Local>> {
    let due_date = due_date.trim();
    let due_time = due_time.trim();
    if due_date.is_empty() {
        return None;
    }

    let naive = if due_time.is_empty() {
        match parse_naive_datetime(due_date) {
            Some(naive) => naive,
            None => NaiveDate::parse_from_str(due_date, "%Y-%m-%d").ok()?
                .and_hms_opt(0, 0, 0)?,
        }
    } else {
        parse_naive_datetime(&format!("{} {}", due_date, due_time))?
    };

    // Moments skipped by a DST transition do not exist; ambiguous ones pick the earliest
    Local.from_local_datetime(&naive).earliest()
}

fn parse_naive_datetime(moment: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS.iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(moment, fmt).ok())
}
