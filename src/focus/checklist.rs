//! Periodic checklist reset
//!
//! Tasks on the daily or weekly checklist get their completion cleared once
//! per calendar day or ISO week. The last seen period key is stored with the
//! data; a reset happens only when a stored key exists and differs from the
//! current one, so the first run merely records the key.

use super::task::{ChecklistKind, Task};
use chrono::{Datelike, NaiveDateTime};
use tracing::info;

/// Key identifying the local calendar day of `now` (e.g. `Mon Oct 19 2026`)
pub fn daily_key(now: NaiveDateTime) -> String {
    now.format("%a %b %d %Y").to_string()
}

/// Key identifying the ISO-8601 week of `now` (e.g. `2026-W43`)
///
/// Weeks start on Monday and week 1 is the week containing the year's first
/// Thursday, so the year part is the ISO week-numbering year. Pairing the
/// week number with the calendar year instead would change the key on
/// January 1 and reset the weekly checklist in the middle of a week.
pub fn weekly_key(now: NaiveDateTime) -> String {
    let week = now.date().iso_week();
    format!("{}-W{}", week.year(), week.week())
}

/// Period key of the given checklist kind
pub fn current_key(kind: ChecklistKind, now: NaiveDateTime) -> String {
    match kind {
        ChecklistKind::Daily => daily_key(now),
        ChecklistKind::Weekly => weekly_key(now),
    }
}

/// Check whether a checklist must be cleared
///
/// A missing or empty stored key is a first run and never resets.
pub fn should_reset(stored_key: Option<&str>, current_key: &str) -> bool {
    match stored_key {
        Some(stored) => !stored.is_empty() && stored != current_key,
        None => false,
    }
}

/// Result of checking one checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistReset {
    pub kind: ChecklistKind,
    /// Whether a new period started since the stored key
    pub reset: bool,
    /// Number of tasks whose completion state was cleared
    pub cleared: usize,
}

/// Reopen every task on the given checklist, returning how many were touched
pub fn reset_checklist(tasks: &mut [Task], kind: ChecklistKind) -> usize {
    let mut cleared = 0;
    for task in tasks.iter_mut().filter(|t| t.list == Some(kind)) {
        task.reopen();
        cleared += 1;
    }
    cleared
}

/// Run the period check for one checklist and record the current key
pub fn apply_period(
    tasks: &mut [Task],
    kind: ChecklistKind,
    stored_key: &mut Option<String>,
    now: NaiveDateTime,
) -> ChecklistReset {
    let current = current_key(kind, now);
    let reset = should_reset(stored_key.as_deref(), &current);
    let cleared = if reset {
        let cleared = reset_checklist(tasks, kind);
        info!(
            checklist = %kind,
            previous = stored_key.as_deref().unwrap_or_default(),
            current = %current,
            cleared,
            "New period started, checklist reset"
        );
        cleared
    } else {
        0
    };
    *stored_key = Some(current);

    ChecklistReset {
        kind,
        reset,
        cleared,
    }
}
