//! A command-line front-end to the todo list.
//!
//! Set the RUST_LOG environment variable to see what happens under the hood, e.g. `RUST_LOG=todo_reminders=debug todo watch`

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use todo_reminders::notification::{DesktopNotifier, LogNotifier, Notifier};
use todo_reminders::storage::FolderStorage;
use todo_reminders::utils::print_todo_list;
use todo_reminders::{TodoApp, TodoFilter};

#[derive(Parser)]
#[command(name = "todo", version, about = "A local todo list with due-time reminders")]
struct Cli {
    /// Folder the todo list is stored in
    #[arg(long, env = "TODO_STORAGE_DIR")]
    storage: Option<PathBuf>,

    /// Write reminders to the log instead of displaying desktop notifications
    #[arg(long)]
    headless: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a todo
    Add {
        task: String,
        /// Due date, e.g. 2099-01-01
        #[arg(long, default_value = "")]
        date: String,
        /// Due time, e.g. 10:00
        #[arg(long, default_value = "")]
        time: String,
    },
    /// List the todos
    List {
        /// all, pending or completed
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Change the text of a todo
    Edit { id: String, task: String },
    /// Mark a todo as completed, or as pending again
    Toggle { id: String },
    /// Delete a todo
    Delete { id: String },
    /// Delete every todo
    Clear,
    /// Show or change the theme
    Theme { name: Option<String> },
    /// Stay in the foreground and display reminders when todos are due
    Watch,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("todo_reminders=info")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let folder = cli.storage.unwrap_or_else(todo_reminders::config::storage_folder);
    log::debug!("Using storage folder {:?}", folder);
    let storage = Arc::new(FolderStorage::new(&folder));
    let notifier: Arc<dyn Notifier> = match cli.headless {
        true => Arc::new(LogNotifier),
        false => Arc::new(DesktopNotifier::new("todo")),
    };
    let mut app = TodoApp::open(storage, notifier);

    match cli.command {
        Command::Add { task, date, time } => {
            if task.trim().is_empty() {
                return Err("Please enter a task".into());
            }
            app.store_mut().add(&task, &date, &time);
            println!("Task added successfully");
        },
        Command::List { filter } => {
            if filter.parse::<TodoFilter>().is_err() {
                log::warn!("Unknown filter {:?}, expected all, pending or completed", filter);
            }
            print_todo_list(app.store().filter(&filter), app.formatter());
        },
        Command::Edit { id, task } => {
            if task.trim().is_empty() {
                return Err("Please enter a task".into());
            }
            let id = app.store().resolve_id(&id)?;
            app.store_mut().edit(&id, &task);
            println!("Todo updated successfully");
        },
        Command::Toggle { id } => {
            let id = app.store().resolve_id(&id)?;
            if let Some(completed) = app.store_mut().toggle_completion(&id) {
                println!("Todo marked as {}", app.formatter().format_status(completed));
            }
        },
        Command::Delete { id } => {
            let id = app.store().resolve_id(&id)?;
            app.store_mut().delete(&id);
            println!("Todo deleted successfully");
        },
        Command::Clear => {
            app.store_mut().clear_all();
            println!("All todos cleared successfully");
        },
        Command::Theme { name: None } => {
            match app.theme().theme() {
                Some(theme) => println!("{}", theme),
                None => println!("No theme set"),
            }
        },
        Command::Theme { name: Some(name) } => {
            app.theme().set_theme(&name)?;
            println!("Theme set to {}", name.trim());
        },
        Command::Watch => {
            println!("{} reminder(s) pending. Press Ctrl-C to stop.", app.store().scheduler().pending_count());
            for entry in app.store().scheduler().pending_entries() {
                println!("  {}  {}", entry.fire_at().format("%Y-%m-%d %H:%M"), entry.todo_id());
            }
            tokio::signal::ctrl_c().await?;
        },
    }
    Ok(())
}
