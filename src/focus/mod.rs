//! Task domain models and business logic
//!
//! The pure core lives in three independent modules:
//! - `recurrence`: next-occurrence calculation and the custom rule subset
//! - `query`: the quick query language used by search and saved filters
//! - `checklist`: once-per-period reset of daily/weekly checklists
//!
//! Around it:
//! - `task`: task, subtask, reminder and filter types
//! - `task_store`: the task collection and its lifecycle operations
//! - `reminders`: selection of reminders due in the current tick
//! - `clock`: injectable source of "now"
//! - `backup`: JSON export and import of tasks and filters

mod backup;
mod checklist;
mod clock;
mod error;
mod query;
mod recurrence;
mod reminders;
mod task;
mod task_store;

pub use backup::ImportSummary;
pub use checklist::{
    ChecklistReset, apply_period, current_key, daily_key, reset_checklist, should_reset,
    weekly_key,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{TaskError, TaskResult};
pub use query::{DueFilter, Query, Term, UPCOMING_WINDOW_DAYS, matches, tokenize};
pub use recurrence::{Frequency, MAX_BYDAY_ADVANCE, RecurrenceRule, Repeat, next_occurrence};
pub use reminders::{FIRE_WINDOW_SECONDS, TICK_SECONDS, due_reminders, fire_time};
pub use task::{
    ChecklistKind, DEFAULT_REMIND_MINUTES, DEFAULT_TITLE, Filter, Priority, Reminder, Subtask,
    Task, UNTITLED, normalize_tag, parse_tags,
};
pub use task_store::{
    CalendarDay, Completion, FILTER_PRESETS, FORMAT_VERSION, MAX_TAG_CLOUD, RESCHEDULE_HOUR,
    SUGGESTIONS, SortKey, TAG_PRESETS, TaskDraft, TaskEdit, TaskStore, View,
};
