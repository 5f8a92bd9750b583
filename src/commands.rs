use std::io::{self, Write};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use uuid::Uuid;

use crate::models::{Priority, Task, TaskId};
use crate::stats::{is_overdue, WindowMode};
use crate::store::TaskStore;

/// Parses a deadline in local time.
///
/// Accepts `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD`
/// (the latter meaning the end of that day).
pub fn parse_deadline(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(end_of_day()))
        })
        .map_err(|e| format!("Invalid deadline '{}': {}. Use YYYY-MM-DD [HH:MM].", s, e))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("Deadline '{}' does not exist in the local time zone.", s))
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

/// Resolves a full id or a unique prefix of one.
pub fn resolve_task_id(store: &TaskStore, needle: &str) -> Result<TaskId, String> {
    let needle = needle.trim().to_lowercase();
    if let Ok(id) = Uuid::parse_str(&needle) {
        return Ok(id);
    }
    if needle.is_empty() {
        return Err("Task id cannot be empty.".into());
    }
    let matches: Vec<TaskId> = store
        .tasks()
        .iter()
        .map(|t| t.id)
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("Task {} not found.", needle)),
        _ => Err(format!("Task id '{}' is ambiguous ({} matches).", needle, matches.len())),
    }
}

/// First 8 hex digits of an id, enough to address a task from the CLI.
pub fn short_id(id: TaskId) -> String {
    id.simple().to_string()[..8].to_string()
}

fn format_local(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn priority_color(p: Priority) -> Color {
    match p {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

/// Adds a new task and schedules its deadline alert.
///
/// Returns the new id, or `None` if the input was rejected.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    store: &mut TaskStore,
    title: String,
    description: Option<String>,
    due: String,
    priority: Option<String>,
    category: Option<String>,
    subtasks: Vec<String>,
    silent: bool,
) -> Option<TaskId> {
    let deadline = match parse_deadline(&due) {
        Ok(d) => d,
        Err(e) => {
            if !silent { eprintln!("{}", e); }
            return None;
        }
    };
    let priority = match priority.as_deref().map(str::parse::<Priority>).transpose() {
        Ok(p) => p.unwrap_or_default(),
        Err(e) => {
            if !silent { eprintln!("{}", e); }
            return None;
        }
    };

    let mut task = Task::new(title, description.unwrap_or_default(), deadline, priority)
        .with_subtasks(subtasks);
    if let Some(name) = category {
        match store.category_named(&name) {
            Some(c) => task = task.with_category(c),
            None => {
                if !silent { eprintln!("Category '{}' not found.", name); }
                return None;
            }
        }
    }

    let id = task.id;
    store.schedule_notification(&task);
    store.add_task(task);
    if !silent { println!("Task added (id = {})", short_id(id)); }
    Some(id)
}

/// Marks a task as complete.
pub fn cmd_complete(store: &mut TaskStore, id: &str, silent: bool) {
    let id = match resolve_task_id(store, id) {
        Ok(id) => id,
        Err(e) => {
            if !silent { eprintln!("{}", e); }
            return;
        }
    };
    match store.complete_task(id) {
        Ok(()) => {
            if !silent { println!("Task {} popped! Marked as complete.", short_id(id)); }
        }
        Err(e) => {
            if !silent { eprintln!("{}", e); }
        }
    }
}

/// Removes a task.
pub fn cmd_remove(store: &mut TaskStore, id: &str, silent: bool) {
    let id = match resolve_task_id(store, id) {
        Ok(id) => id,
        Err(e) => {
            if !silent { eprintln!("{}", e); }
            return;
        }
    };
    if store.delete_task(id) == 0 {
        if !silent { eprintln!("Task {} not found.", short_id(id)); }
    } else if !silent {
        println!("Task {} removed.", short_id(id));
    }
}

/// Edits an existing task's details. `category` of `none` clears it.
#[allow(clippy::too_many_arguments)]
pub fn cmd_edit(
    store: &mut TaskStore,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    due: Option<String>,
    priority: Option<String>,
    category: Option<String>,
    subtasks: Option<Vec<String>>,
    silent: bool,
) {
    let id = match resolve_task_id(store, id) {
        Ok(id) => id,
        Err(e) => {
            if !silent { eprintln!("{}", e); }
            return;
        }
    };
    let mut task = match store.task(id) {
        Some(t) => t.clone(),
        None => {
            if !silent { eprintln!("Task {} not found.", short_id(id)); }
            return;
        }
    };

    if let Some(t) = title { task.title = t; }
    if let Some(d) = description { task.description = d; }
    if let Some(s) = subtasks { task.subtasks = s; }
    if let Some(d) = due {
        match parse_deadline(&d) {
            Ok(deadline) => task.deadline = deadline,
            Err(e) => {
                if !silent { eprintln!("{}", e); }
                return;
            }
        }
    }
    if let Some(p) = priority {
        match p.parse::<Priority>() {
            Ok(p) => task.priority = p,
            Err(e) => {
                if !silent { eprintln!("{}", e); }
                return;
            }
        }
    }
    if let Some(name) = category {
        if name.trim().eq_ignore_ascii_case("none") {
            task.category = None;
        } else {
            match store.category_named(&name) {
                Some(c) => task.category = Some(c.clone()),
                None => {
                    if !silent { eprintln!("Category '{}' not found.", name); }
                    return;
                }
            }
        }
    }

    // Deadline or text may have changed; replace the pending alert.
    store.schedule_notification(&task);
    match store.update_task(task) {
        Ok(()) => {
            if !silent { println!("Task {} updated.", short_id(id)); }
        }
        Err(e) => {
            if !silent { eprintln!("{}", e); }
        }
    }
}

/// Lists tasks in insertion order. Hides completed tasks unless `all` is true.
pub fn cmd_list(store: &TaskStore, all: bool) {
    let tasks: Vec<&Task> = store
        .tasks()
        .iter()
        .filter(|t| all || !t.is_completed)
        .collect();
    if tasks.is_empty() {
        println!("No tasks in orbit.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Deadline").add_attribute(Attribute::Bold),
            Cell::new("Subtasks").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    let now = Utc::now();
    for t in tasks {
        let overdue = is_overdue(t, &now);
        let status = if t.is_completed { "Done" } else if overdue { "Overdue" } else { "Pending" };
        let status_color = if t.is_completed {
            Color::Green
        } else if overdue {
            Color::Red
        } else {
            Color::Yellow
        };

        table.add_row(vec![
            Cell::new(short_id(t.id)),
            Cell::new(&t.title),
            Cell::new(t.category.as_ref().map(|c| c.name.as_str()).unwrap_or("-")),
            Cell::new(t.priority).fg(priority_color(t.priority)),
            Cell::new(format_local(t.deadline)),
            Cell::new(t.subtasks.len()),
            Cell::new(status).fg(status_color),
        ]);
    }

    println!("{table}");
}

/// Prints every field of one task.
pub fn cmd_show(store: &TaskStore, id: &str) {
    let task = match resolve_task_id(store, id).and_then(|id| {
        store.task(id).ok_or_else(|| format!("Task {} not found.", short_id(id)))
    }) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.add_row(vec!["ID".to_string(), task.id.to_string()]);
    table.add_row(vec!["Title".to_string(), task.title.clone()]);
    table.add_row(vec!["Description".to_string(), task.description.clone()]);
    table.add_row(vec!["Priority".to_string(), task.priority.to_string()]);
    table.add_row(vec!["Deadline".to_string(), format_local(task.deadline)]);
    table.add_row(vec![
        "Category".to_string(),
        task.category.as_ref().map(|c| c.name.clone()).unwrap_or_else(|| "-".into()),
    ]);
    table.add_row(vec![
        "Completed".to_string(),
        task.completed_date.map(format_local).unwrap_or_else(|| "no".into()),
    ]);
    for (i, s) in task.subtasks.iter().enumerate() {
        table.add_row(vec![format!("Subtask {}", i + 1), s.clone()]);
    }
    println!("{table}");
}

/// Prints completion statistics.
pub fn cmd_stats(store: &TaskStore, window: WindowMode) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        format!("Completed ({})", window),
        store.completed_tasks_count(window).to_string(),
    ]);
    table.add_row(vec![
        "Average daily tasks".to_string(),
        format!("{:.1}", store.average_daily_tasks()),
    ]);
    table.add_row(vec![
        "Completion streak".to_string(),
        format!("{} day(s)", store.completion_streak()),
    ]);
    let status = store.status_breakdown();
    table.add_row(vec!["Completed tasks".to_string(), status.completed.to_string()]);
    table.add_row(vec!["Active tasks".to_string(), status.active.to_string()]);
    table.add_row(vec!["Overdue tasks".to_string(), status.overdue.to_string()]);
    println!("{table}");

    let mut pyramid = Table::new();
    pyramid
        .load_preset(UTF8_FULL)
        .set_header(vec!["Day", "Popped"]);
    let today = Local::now().date_naive();
    for (offset, n) in store.daily_completions(7).into_iter().enumerate() {
        let day = today - chrono::Duration::days(offset as i64);
        pyramid.add_row(vec![day.format("%a %m-%d").to_string(), "●".repeat(n)]);
    }
    println!("{pyramid}");
}

/// Lists all categories.
pub fn cmd_categories(store: &TaskStore) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Name", "Colors", "Tasks"]);
    for c in store.categories() {
        let used = store
            .tasks()
            .iter()
            .filter(|t| t.category.as_ref() == Some(c))
            .count();
        table.add_row(vec![c.name.clone(), c.color.join(" → "), used.to_string()]);
    }
    println!("{table}");
}

/// Deletes all tasks and restores the default categories.
pub fn cmd_reset(store: &mut TaskStore, force: bool) {
    if !force {
        print!("Are you sure you want to delete all tasks and categories? This cannot be undone. [y/N] ");
        let mut input = String::new();
        if io::stdout().flush().is_err() || io::stdin().read_line(&mut input).is_err() {
            eprintln!("Failed to read confirmation.");
            return;
        }
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = store.reset() {
        eprintln!("Failed to reset database: {}", e);
    } else {
        println!("Database reset successfully.");
    }
}
