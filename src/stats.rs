use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, NaiveDate, TimeZone, Utc};

use crate::models::Task;

/// Trailing window used by [`completed_tasks_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// The last 7 days.
    Weekly,
    /// The last calendar month.
    Monthly,
}

impl WindowMode {
    /// Start of the window ending at `now`.
    pub fn window_start<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        match self {
            WindowMode::Weekly => now.clone() - Duration::days(7),
            // Month subtraction can only fail on out-of-range or ambiguous local times.
            WindowMode::Monthly => now
                .clone()
                .checked_sub_months(Months::new(1))
                .unwrap_or_else(|| now.clone() - Duration::days(30)),
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowMode::Weekly => f.write_str("weekly"),
            WindowMode::Monthly => f.write_str("monthly"),
        }
    }
}

impl FromStr for WindowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(WindowMode::Weekly),
            "monthly" | "month" => Ok(WindowMode::Monthly),
            other => Err(format!(
                "unknown window '{}'. Supported: weekly, monthly.",
                other
            )),
        }
    }
}

fn completion_dates(tasks: &[Task]) -> impl Iterator<Item = DateTime<Utc>> + '_ {
    tasks
        .iter()
        .filter(|t| t.is_completed)
        .filter_map(|t| t.completed_date)
}

fn completion_days<Tz: TimeZone>(tasks: &[Task], tz: &Tz) -> HashSet<NaiveDate> {
    completion_dates(tasks)
        .map(|d| d.with_timezone(tz).date_naive())
        .collect()
}

/// Counts tasks completed inside the trailing `mode` window ending at `now`.
pub fn completed_tasks_count<Tz: TimeZone>(
    tasks: &[Task],
    mode: WindowMode,
    now: &DateTime<Tz>,
) -> usize {
    let start = mode.window_start(now).with_timezone(&Utc);
    let end = now.with_timezone(&Utc);
    completion_dates(tasks)
        .filter(|d| *d >= start && *d <= end)
        .count()
}

/// Average number of completions per day that had at least one completion.
///
/// Days are calendar days in `tz`. Returns `0.0` when nothing has been completed.
pub fn average_daily_tasks<Tz: TimeZone>(tasks: &[Task], tz: &Tz) -> f64 {
    let completed = completion_dates(tasks).count();
    if completed == 0 {
        return 0.0;
    }
    let days = completion_days(tasks, tz).len();
    completed as f64 / days as f64
}

/// Number of consecutive calendar days, ending today, with at least one completion.
///
/// Returns 0 when nothing was completed today.
pub fn completion_streak<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> u32 {
    let days = completion_days(tasks, &now.timezone());
    let mut day = now.date_naive();
    let mut streak = 0;
    while days.contains(&day) {
        streak += 1;
        day = match day.pred_opt() {
            Some(d) => d,
            None => break,
        };
    }
    streak
}

/// Tasks split the way the statistics bubble chart colors them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub completed: usize,
    /// Open and not yet past the deadline.
    pub active: usize,
    /// Open with the deadline already passed.
    pub overdue: usize,
}

/// An open task whose deadline is strictly before `now`.
pub fn is_overdue<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> bool {
    !task.is_completed && task.deadline < now.with_timezone(&Utc)
}

/// Counts completed, active and overdue tasks as of `now`.
///
/// A deadline equal to `now` still counts as active.
pub fn status_breakdown<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for t in tasks {
        if t.is_completed {
            counts.completed += 1;
        } else if is_overdue(t, now) {
            counts.overdue += 1;
        } else {
            counts.active += 1;
        }
    }
    counts
}

/// Completions per calendar day for the last `days` days, today first.
///
/// Days are calendar days in `now`'s time zone.
pub fn daily_completions<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>, days: usize) -> Vec<usize> {
    let tz = now.timezone();
    let mut counts = vec![0; days];
    let today = now.date_naive();
    for d in completion_dates(tasks) {
        let offset = (today - d.with_timezone(&tz).date_naive()).num_days();
        if offset >= 0 && (offset as usize) < days {
            counts[offset as usize] += 1;
        }
    }
    counts
}
