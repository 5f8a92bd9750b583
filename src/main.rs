//! # Taskorbit
//!
//! Command-line front end for the Taskorbit task core. The mobile app draws
//! tasks as orbiting spheres; this binary is the plain-text view of the same
//! data, useful for scripting and for inspecting what the app persisted.
//!
//! ## Usage
//!
//! ```bash
//! # Add a task (deadline in local time)
//! taskorbit add "Launch rocket" --due "2025-12-01 09:30" --priority high --category Work
//!
//! # With subtasks
//! taskorbit add "Pack" --due 2025-12-01 --subtask "Helmet" --subtask "Snacks"
//!
//! # List open tasks (or everything with --all)
//! taskorbit list
//!
//! # Complete / remove by id prefix
//! taskorbit complete 3fa85f64
//! taskorbit remove 3fa8
//!
//! # Statistics
//! taskorbit stats --window monthly
//! ```
//!
//! ## Data Storage
//!
//! Data lives in `tasks.json` and `categories.json` inside the local data
//! directory (`~/.local/share/taskorbit` on Linux). Override it with
//! `TASKORBIT_DATA_DIR`. Set `TASKORBIT_LOG` to change log verbosity.

use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use taskorbit::commands::*;
use taskorbit::{init_logging, Config, JsonFileStore, LogNotifier, TaskStore, WindowMode};

#[derive(Parser)]
#[command(name = "taskorbit")]
#[command(about = "Cosmic to-do list, terminal edition", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Longer description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// Deadline as YYYY-MM-DD or "YYYY-MM-DD HH:MM"
        #[arg(short, long)]
        due: String,
        /// Priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<String>,
        /// Category name
        #[arg(short, long)]
        category: Option<String>,
        /// Subtask label (repeatable)
        #[arg(short, long = "subtask")]
        subtasks: Vec<String>,
    },
    /// List tasks
    List {
        /// Show completed tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Show one task in detail
    Show {
        id: String,
    },
    /// Mark a task as complete
    Complete {
        id: String,
    },
    /// Remove a task
    Remove {
        id: String,
    },
    /// Edit a task
    Edit {
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// New deadline
        #[arg(short, long)]
        due: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<String>,
        /// New category name, or "none"
        #[arg(short, long)]
        category: Option<String>,
        /// Replace subtasks (repeatable)
        #[arg(short, long = "subtask")]
        subtasks: Option<Vec<String>>,
    },
    /// Show completion statistics
    Stats {
        /// Window for the completed count (weekly, monthly)
        #[arg(short, long, default_value = "weekly")]
        window: WindowMode,
    },
    /// List categories
    Categories,
    /// Reset the database (delete all tasks, restore default categories)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = Config::from_env();
    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("Logging disabled: {}", e);
    }

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "taskorbit", &mut io::stdout());
        return;
    }

    let mut store = TaskStore::open(
        Box::new(JsonFileStore::new(&config.data_dir)),
        Box::new(LogNotifier),
    );

    match cli.command {
        Some(Commands::Add { title, description, due, priority, category, subtasks }) => {
            cmd_add(&mut store, title, description, due, priority, category, subtasks, false);
        }
        Some(Commands::List { all }) => cmd_list(&store, all),
        Some(Commands::Show { id }) => cmd_show(&store, &id),
        Some(Commands::Complete { id }) => cmd_complete(&mut store, &id, false),
        Some(Commands::Remove { id }) => cmd_remove(&mut store, &id, false),
        Some(Commands::Edit { id, title, description, due, priority, category, subtasks }) => {
            cmd_edit(&mut store, &id, title, description, due, priority, category, subtasks, false)
        }
        Some(Commands::Stats { window }) => cmd_stats(&store, window),
        Some(Commands::Categories) => cmd_categories(&store),
        Some(Commands::Reset { force }) => cmd_reset(&mut store, force),
        Some(Commands::Completions { .. }) => {}
        None => cmd_list(&store, false),
    }
}
