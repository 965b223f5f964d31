use super::task::Task;
use chrono::{Duration, NaiveDateTime};

/// Interval between reminder checks, in seconds
pub const TICK_SECONDS: u64 = 30;

/// Reminders fire if their time passed less than this many seconds ago
///
/// Slightly wider than the tick so that no reminder falls between two checks.
pub const FIRE_WINDOW_SECONDS: i64 = 31;

/// Moment at which a task's reminder should fire
pub fn fire_time(task: &Task) -> Option<NaiveDateTime> {
    if !task.remind.enabled {
        return None;
    }
    let due = task.due?;
    due.checked_sub_signed(Duration::minutes(i64::from(task.remind.minutes_before)))
}

/// Open tasks whose reminder fires in the window ending at `now`
pub fn due_reminders(tasks: &[Task], now: NaiveDateTime) -> Vec<&Task> {
    let window = Duration::seconds(FIRE_WINDOW_SECONDS);
    tasks
        .iter()
        .filter(|task| !task.is_completed())
        .filter(|task| match fire_time(task) {
            Some(fire_at) => now >= fire_at && now - fire_at < window,
            None => false,
        })
        .collect()
}
