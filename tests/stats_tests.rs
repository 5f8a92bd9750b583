mod common;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use common::{completed_at, task};
use taskorbit::stats::{
    average_daily_tasks, completed_tasks_count, completion_streak, daily_completions, is_overdue,
    status_breakdown,
};
use taskorbit::{StatusCounts, WindowMode};

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

#[test]
fn test_average_daily_tasks_empty_is_zero() {
    assert_eq!(average_daily_tasks(&[], &Utc), 0.0);
    // Open tasks do not count.
    assert_eq!(average_daily_tasks(&[task("open")], &Utc), 0.0);
}

#[test]
fn test_average_daily_tasks_groups_by_calendar_day() {
    let tasks = vec![
        completed_at("a", at(2025, 5, 1, 8)),
        completed_at("b", at(2025, 5, 1, 22)),
        completed_at("c", at(2025, 5, 3, 9)),
        completed_at("d", at(2025, 5, 3, 10)),
    ];
    assert_eq!(average_daily_tasks(&tasks, &Utc), 2.0);
}

#[test]
fn test_average_daily_tasks_respects_time_zone() {
    // 22:00 UTC on May 1st is already May 2nd at UTC+3.
    let tasks = vec![
        completed_at("a", at(2025, 5, 1, 8)),
        completed_at("b", at(2025, 5, 1, 22)),
    ];
    let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
    assert_eq!(average_daily_tasks(&tasks, &Utc), 2.0);
    assert_eq!(average_daily_tasks(&tasks, &plus_three), 1.0);
}

#[test]
fn test_completion_streak_counts_consecutive_days() {
    let now = at(2025, 6, 10, 15);
    let tasks = vec![
        completed_at("today", at(2025, 6, 10, 9)),
        completed_at("yesterday", at(2025, 6, 9, 23)),
        // gap on the 8th
        completed_at("older", at(2025, 6, 7, 12)),
    ];
    assert_eq!(completion_streak(&tasks, &now), 2);
}

#[test]
fn test_completion_streak_zero_without_completion_today() {
    let now = at(2025, 6, 10, 15);
    let tasks = vec![
        completed_at("yesterday", at(2025, 6, 9, 12)),
        completed_at("day before", at(2025, 6, 8, 12)),
    ];
    assert_eq!(completion_streak(&tasks, &now), 0);
    assert_eq!(completion_streak(&[], &now), 0);
}

#[test]
fn test_completion_streak_ignores_multiple_completions_per_day() {
    let now = at(2025, 6, 10, 15);
    let tasks = vec![
        completed_at("a", at(2025, 6, 10, 1)),
        completed_at("b", at(2025, 6, 10, 2)),
        completed_at("c", at(2025, 6, 10, 3)),
    ];
    assert_eq!(completion_streak(&tasks, &now), 1);
}

#[test]
fn test_weekly_count_window_edges() {
    let now = at(2025, 6, 20, 12);
    let tasks = vec![
        completed_at("six days", now - Duration::days(6)),
        completed_at("eight days", now - Duration::days(8)),
        task("open"),
    ];
    assert_eq!(completed_tasks_count(&tasks, WindowMode::Weekly, &now), 1);
}

#[test]
fn test_monthly_count_uses_calendar_month() {
    let now = at(2025, 3, 15, 12);
    let tasks = vec![
        completed_at("in window", at(2025, 2, 16, 12)),
        completed_at("boundary", at(2025, 2, 15, 12)),
        completed_at("too old", at(2025, 2, 14, 12)),
    ];
    assert_eq!(completed_tasks_count(&tasks, WindowMode::Monthly, &now), 2);
}

#[test]
fn test_count_ignores_completion_dates_on_open_tasks() {
    let now = at(2025, 6, 20, 12);
    let mut odd = task("odd");
    odd.completed_date = Some(now - Duration::days(1));
    assert_eq!(completed_tasks_count(&[odd], WindowMode::Weekly, &now), 0);
}

fn due_at(title: &str, deadline: DateTime<Utc>) -> taskorbit::Task {
    let mut t = task(title);
    t.deadline = deadline;
    t
}

#[test]
fn test_status_breakdown_splits_completed_active_overdue() {
    let now = at(2025, 6, 20, 12);
    let tasks = vec![
        completed_at("done", now - Duration::days(1)),
        due_at("later", now + Duration::hours(3)),
        due_at("late", now - Duration::hours(3)),
        due_at("late too", now - Duration::days(2)),
    ];
    assert_eq!(
        status_breakdown(&tasks, &now),
        StatusCounts { completed: 1, active: 1, overdue: 2 }
    );
}

#[test]
fn test_deadline_equal_to_now_is_active() {
    let now = at(2025, 6, 20, 12);
    let on_the_dot = due_at("on the dot", now);
    assert!(!is_overdue(&on_the_dot, &now));
    assert_eq!(
        status_breakdown(&[on_the_dot], &now),
        StatusCounts { completed: 0, active: 1, overdue: 0 }
    );
}

#[test]
fn test_completed_task_past_deadline_is_not_overdue() {
    let now = at(2025, 6, 20, 12);
    let mut t = completed_at("late but done", now);
    t.deadline = now - Duration::days(5);
    assert!(!is_overdue(&t, &now));
    assert_eq!(status_breakdown(&[t], &now).completed, 1);
}

#[test]
fn test_daily_completions_today_first() {
    let now = at(2025, 6, 10, 15);
    let tasks = vec![
        completed_at("today a", at(2025, 6, 10, 1)),
        completed_at("today b", at(2025, 6, 10, 14)),
        completed_at("two days ago", at(2025, 6, 8, 23)),
        completed_at("six days ago", at(2025, 6, 4, 0)),
        completed_at("a week ago", at(2025, 6, 3, 12)),
        task("open"),
    ];
    assert_eq!(daily_completions(&tasks, &now, 7), vec![2, 0, 1, 0, 0, 0, 1]);
}

#[test]
fn test_daily_completions_uses_calendar_of_now() {
    // 22:00 UTC on June 9th is June 10th at UTC+3.
    let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
    let now = at(2025, 6, 10, 12).with_timezone(&plus_three);
    let tasks = vec![completed_at("late night", at(2025, 6, 9, 22))];
    assert_eq!(daily_completions(&tasks, &now, 3), vec![1, 0, 0]);
    assert_eq!(daily_completions(&tasks, &at(2025, 6, 10, 12), 3), vec![0, 1, 0]);
}

#[test]
fn test_daily_completions_ignores_future_and_zero_days() {
    let now = at(2025, 6, 10, 15);
    let tasks = vec![completed_at("tomorrow", at(2025, 6, 11, 9))];
    assert_eq!(daily_completions(&tasks, &now, 7), vec![0; 7]);
    assert!(daily_completions(&tasks, &now, 0).is_empty());
}
