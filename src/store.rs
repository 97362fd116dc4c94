//! The todo list
//!
//! [`TodoStore`] owns the canonical list of todos. Every mutation rewrites the whole list to storage, then hands a copy of it to the [`NotificationScheduler`].

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use crate::config::TODOS_KEY;
use crate::scheduler::NotificationScheduler;
use crate::storage::{load_json, save_json, KeyValueStore};
use crate::todo::{TodoId, TodoRecord};


/// Which todos a listing should return
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TodoFilter {
    All,
    Pending,
    Completed,
}

impl TodoFilter {
    pub fn matches(&self, todo: &TodoRecord) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Pending => todo.completed() == false,
            TodoFilter::Completed => todo.completed(),
        }
    }
}

impl FromStr for TodoFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TodoFilter::All),
            "pending" => Ok(TodoFilter::Pending),
            "completed" => Ok(TodoFilter::Completed),
            other => Err(format!("Unknown todo filter {:?}", other)),
        }
    }
}

impl Display for TodoFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TodoFilter::All => write!(f, "all"),
            TodoFilter::Pending => write!(f, "pending"),
            TodoFilter::Completed => write!(f, "completed"),
        }
    }
}


/// The canonical todo list, persisted under the `todos` key
pub struct TodoStore {
    todos: Vec<TodoRecord>,
    storage: Arc<dyn KeyValueStore>,
    scheduler: NotificationScheduler,
}

impl TodoStore {
    /// Create an empty store. Nothing is read from nor written to `storage` yet.
    pub fn new(storage: Arc<dyn KeyValueStore>, scheduler: NotificationScheduler) -> Self {
        Self { todos: Vec::new(), storage, scheduler }
    }

    /// Initialize a store from the todos persisted in `storage`, and (re)schedule their reminders.
    ///
    /// Missing or unreadable data results in an empty list.
    pub fn load(storage: Arc<dyn KeyValueStore>, scheduler: NotificationScheduler) -> Self {
        let todos = match load_json::<Vec<TodoRecord>>(&*storage, TODOS_KEY) {
            Ok(Some(todos)) => todos,
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("Invalid todo list in storage: {}. Starting with an empty list", err);
                Vec::new()
            },
        };
        log::debug!("Loaded {} todo(s)", todos.len());

        let mut store = Self { todos, storage, scheduler };
        store.scheduler.set_snapshot(store.todos.clone());
        store.scheduler.restore_on_startup();
        store
    }

    pub fn scheduler(&self) -> &NotificationScheduler {
        &self.scheduler
    }

    /// Every todo, in insertion order
    pub fn todos(&self) -> &[TodoRecord] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: &TodoId) -> Option<&TodoRecord> {
        self.todos.iter().find(|todo| todo.id() == id)
    }

    /// Find the todo whose id is `id`, or starts with `id` if that is unambiguous
    pub fn resolve_id(&self, id: &str) -> Result<TodoId, Box<dyn Error>> {
        if id.trim().is_empty() {
            return Err("A todo id cannot be empty".into());
        }
        let exact = TodoId::from(id);
        if self.get(&exact).is_some() {
            return Ok(exact);
        }

        let mut candidates = self.todos.iter()
            .map(|todo| todo.id())
            .filter(|candidate| candidate.as_str().starts_with(id));
        match (candidates.next(), candidates.next()) {
            (Some(found), None) => Ok(found.clone()),
            (None, _) => Err(format!("No todo matches {:?}", id).into()),
            (Some(_), Some(_)) => Err(format!("Several todos match {:?}, please be more specific", id).into()),
        }
    }

    /// A fresh random id.
    ///
    /// No check is performed against the existing ids, collisions are considered negligible
    pub fn generate_id(&self) -> TodoId {
        TodoId::random()
    }

    /// Append a new, uncompleted todo.
    ///
    /// The task text is stored as is. Rejecting empty tasks is up to the caller.
    pub fn add(&mut self, task: &str, due_date: &str, due_time: &str) -> TodoRecord {
        let todo = TodoRecord::new_with_parameters(
            self.generate_id(),
            task.to_string(),
            due_date.to_string(),
            due_time.to_string(),
            false);
        log::debug!("Adding todo {}", todo.id());
        self.todos.push(todo.clone());
        self.save();
        todo
    }

    /// Replace the task text of a todo. Does nothing if there is no such todo
    pub fn edit(&mut self, id: &TodoId, new_task: &str) -> Option<&TodoRecord> {
        let position = self.position(id)?;
        self.todos[position].set_task(new_task.to_string());
        self.save();
        self.todos.get(position)
    }

    /// Remove a todo, if it exists.
    ///
    /// The list is persisted and rescheduled in any case.
    pub fn delete(&mut self, id: &TodoId) -> Option<TodoRecord> {
        let removed = self.position(id).map(|position| self.todos.remove(position));
        if removed.is_none() {
            log::debug!("No todo {} to delete", id);
        }
        self.save();
        removed
    }

    /// Flip the completion status of a todo, and return its new value. Does nothing if there is no such todo
    pub fn toggle_completion(&mut self, id: &TodoId) -> Option<bool> {
        let position = self.position(id)?;
        let todo = &mut self.todos[position];
        let completed = todo.completed() == false;
        todo.set_completed(completed);
        self.save();
        Some(completed)
    }

    /// Remove every todo, and cancel every reminder.
    ///
    /// Nothing is written if the list is already empty.
    pub fn clear_all(&mut self) {
        if self.todos.is_empty() == false {
            self.todos.clear();
            self.persist();
            self.scheduler.update_todo_list(Vec::new());
        }
        self.scheduler.cancel_all();
    }

    /// The todos matching `status` (`"all"`, `"pending"` or `"completed"`), in insertion order.
    ///
    /// An unknown status matches nothing.
    pub fn filter<'a>(&'a self, status: &str) -> impl Iterator<Item = &'a TodoRecord> + 'a {
        let filter = match status.parse::<TodoFilter>() {
            Ok(filter) => Some(filter),
            Err(err) => {
                log::debug!("{}", err);
                None
            },
        };
        self.todos.iter()
            .filter(move |todo| filter.map_or(false, |f| f.matches(todo)))
    }

    /// The todos matching `filter`, in insertion order
    pub fn filter_by<'a>(&'a self, filter: TodoFilter) -> impl Iterator<Item = &'a TodoRecord> + 'a {
        self.todos.iter()
            .filter(move |todo| filter.matches(todo))
    }

    fn position(&self, id: &TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id() == id)
    }

    /// Persist the whole list, then reschedule every reminder
    fn save(&mut self) {
        self.persist();
        self.scheduler.update_todo_list(self.todos.clone());
    }

    fn persist(&self) {
        if let Err(err) = save_json(&*self.storage, TODOS_KEY, &self.todos) {
            log::warn!("Unable to save the todo list: {}", err);
        }
    }
}
