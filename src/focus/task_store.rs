use super::checklist::{self, ChecklistReset};
use super::error::{TaskError, TaskResult};
use super::query::{DueFilter, Query};
use super::recurrence::{Repeat, next_occurrence};
use super::task::{
    ChecklistKind, DEFAULT_TITLE, Filter, Priority, Reminder, Subtask, Task, UNTITLED, parse_tags,
};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Current version of the storage format
pub const FORMAT_VERSION: u32 = 1;

/// Maximum number of entries returned by [`TaskStore::tag_counts`]
pub const MAX_TAG_CLOUD: usize = 30;

/// Hour of day used when a task is dropped onto a calendar day
pub const RESCHEDULE_HOUR: u32 = 9;

/// Tags offered while no task carries any tag
pub const TAG_PRESETS: [&str; 5] = ["work", "health", "home", "study", "errands"];

/// Filters offered while no filter has been saved, as (name, query)
pub const FILTER_PRESETS: [(&str, &str); 3] = [
    ("Urgent", "priority:1"),
    ("Due Today", "due:today"),
    ("With #work tag", "tag:work"),
];

/// Starter tasks offered while the collection is empty
pub const SUGGESTIONS: [(&str, Priority); 5] = [
    ("Drink Water", Priority::Medium),
    ("Read for 10 minutes", Priority::Medium),
    ("Exercise/Stretch", Priority::Medium),
    ("Plan tomorrow", Priority::Low),
    ("Clear workspace", Priority::Low),
];

/// Built-in task views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Every task
    #[default]
    Inbox,
    /// Open tasks due today
    Today,
    /// Open tasks due within the next seven days
    Upcoming,
    /// Open tasks on the daily checklist
    Daily,
    /// Open tasks on the weekly checklist
    Weekly,
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            View::Inbox => "All Tasks",
            View::Today => "Today",
            View::Upcoming => "Upcoming",
            View::Daily => "Daily Checklist",
            View::Weekly => "Weekly Plan",
        }
    }

    fn includes(self, task: &Task, now: NaiveDateTime) -> bool {
        let open = !task.is_completed();
        match self {
            View::Inbox => true,
            View::Today => open && DueFilter::Today.matches(task.due, now),
            View::Upcoming => open && DueFilter::Upcoming.matches(task.due, now),
            View::Daily => open && task.list == Some(ChecklistKind::Daily),
            View::Weekly => open && task.list == Some(ChecklistKind::Weekly),
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inbox" | "all" | "" => Ok(View::Inbox),
            "today" => Ok(View::Today),
            "upcoming" => Ok(View::Upcoming),
            "daily" => Ok(View::Daily),
            "weekly" => Ok(View::Weekly),
            other => Err(format!(
                "Invalid view '{}'. Valid views: inbox, today, upcoming, daily, weekly",
                other
            )),
        }
    }
}

/// Ordering applied to listed tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Oldest first
    #[default]
    Created,
    /// High priority first
    Priority,
    /// Earliest due first, undated last
    Due,
    /// Alphabetical, ignoring case
    Title,
}

impl SortKey {
    fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortKey::Created => a.created.cmp(&b.created),
            SortKey::Priority => a.priority.level().cmp(&b.priority.level()),
            SortKey::Due => match (a.due, b.due) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::Title => a
                .title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title)),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" | "" => Ok(SortKey::Created),
            "priority" => Ok(SortKey::Priority),
            "due" => Ok(SortKey::Due),
            "title" => Ok(SortKey::Title),
            other => Err(format!(
                "Invalid sort '{}'. Valid options: created, priority, due, title",
                other
            )),
        }
    }
}

/// Values for a task being created; unset fields take the defaults
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub due: Option<NaiveDateTime>,
    pub priority: Option<Priority>,
    /// Comma-separated tag text
    pub tags: Option<String>,
    pub list: Option<ChecklistKind>,
    pub repeat: Option<Repeat>,
    pub remind: Option<Reminder>,
}

/// Changes applied by a detail edit; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub notes: Option<String>,
    /// `Some(None)` clears the due date
    pub due: Option<Option<NaiveDateTime>>,
    pub priority: Option<Priority>,
    /// Comma-separated tag text replacing the whole tag set
    pub tags: Option<String>,
    /// `Some(None)` removes the task from its checklist
    pub list: Option<Option<ChecklistKind>>,
    pub repeat: Option<Repeat>,
    pub remind_enabled: Option<bool>,
    pub remind_minutes: Option<u32>,
}

/// Outcome of completing or reopening a task
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub task_id: String,
    pub completed: Option<NaiveDateTime>,
    /// Follow-up occurrence spawned by a recurring task
    pub next: Option<Task>,
}

/// One day of the calendar week
#[derive(Debug, Clone)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub tasks: Vec<&'a Task>,
}

/// The task collection with its saved filters and checklist period keys
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStore {
    /// Format version of the TOML file
    pub format_version: u32,

    /// Counter for generated task, subtask and filter IDs
    pub task_counter: u64,

    /// Day key recorded by the last daily checklist check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_key: Option<String>,

    /// Week key recorded by the last weekly checklist check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_key: Option<String>,

    /// Tasks, newest created first; spawned occurrences are appended
    pub(crate) tasks: Vec<Task>,

    pub(crate) filters: Vec<Filter>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            task_counter: 0,
            daily_key: None,
            weekly_key: None,
            tasks: Vec::new(),
            filters: Vec::new(),
        }
    }
}

impl fmt::Display for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} task(s), {} saved filter(s)",
            self.tasks.len(),
            self.filters.len()
        )
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> TaskResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))
    }

    fn next_counter(&mut self) -> u64 {
        self.task_counter += 1;
        self.task_counter
    }

    /// Generate an unused task ID of the form `task-N`
    fn generate_task_id(&mut self) -> String {
        loop {
            let id = format!("task-{}", self.next_counter());
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Generate a subtask ID of the form `sub-N`, unused within `existing`
    fn generate_subtask_id(&mut self, existing: &[Subtask]) -> String {
        loop {
            let id = format!("sub-{}", self.next_counter());
            if !existing.iter().any(|s| s.id == id) {
                return id;
            }
        }
    }

    /// Create a task from a draft and insert it at the front of the collection
    pub fn create_task(&mut self, draft: TaskDraft, now: NaiveDateTime) -> TaskResult<&Task> {
        let id = match draft.id.map(|id| id.trim().to_string()) {
            Some(id) if !id.is_empty() => {
                if self.get(&id).is_some() {
                    return Err(TaskError::DuplicateTaskId(id));
                }
                id
            }
            _ => self.generate_task_id(),
        };

        let mut task = Task::new(id, now);
        if let Some(title) = draft.title {
            let title = title.trim();
            task.title = if title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title.to_string()
            };
        }
        if let Some(notes) = draft.notes {
            task.notes = notes.trim().to_string();
        }
        task.due = draft.due;
        if let Some(priority) = draft.priority {
            task.priority = priority;
        }
        if let Some(tags) = draft.tags {
            task.tags = parse_tags(&tags);
        }
        task.list = draft.list;
        if let Some(repeat) = draft.repeat {
            task.repeat = repeat;
        }
        if let Some(remind) = draft.remind {
            task.remind = remind;
        }

        debug!(task = %task.id, "Task created");
        self.tasks.insert(0, task);
        Ok(&self.tasks[0])
    }

    /// Apply a detail edit to a task
    pub fn update_task(&mut self, id: &str, edit: TaskEdit) -> TaskResult<&Task> {
        let task = self.get_mut(id)?;

        if let Some(title) = edit.title {
            let title = title.trim();
            task.title = if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title.to_string()
            };
        }
        if let Some(notes) = edit.notes {
            task.notes = notes.trim().to_string();
        }
        if let Some(due) = edit.due {
            task.due = due;
        }
        if let Some(priority) = edit.priority {
            task.priority = priority;
        }
        if let Some(tags) = edit.tags {
            task.tags = parse_tags(&tags);
        }
        if let Some(list) = edit.list {
            task.list = list;
        }
        if let Some(repeat) = edit.repeat {
            task.repeat = repeat;
        }
        if let Some(enabled) = edit.remind_enabled {
            task.remind.enabled = enabled;
        }
        if let Some(minutes) = edit.remind_minutes {
            task.remind.minutes_before = minutes;
        }

        Ok(&*task)
    }

    /// Remove a task together with its subtasks
    pub fn delete_task(&mut self, id: &str) -> TaskResult<Task> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))?;
        debug!(task = %id, "Task deleted");
        Ok(self.tasks.remove(pos))
    }

    /// Mark a task completed or open again
    ///
    /// Completing a recurring task appends a copy for the next occurrence: new
    /// IDs for the task and its subtasks, nothing done, created `now`, due at
    /// the next occurrence. The completed original stays in the collection.
    pub fn set_completed(
        &mut self,
        id: &str,
        done: bool,
        now: NaiveDateTime,
    ) -> TaskResult<Completion> {
        let task = self.get_mut(id)?;
        task.completed = if done { Some(now) } else { None };

        let mut completion = Completion {
            task_id: task.id.clone(),
            completed: task.completed,
            next: None,
        };
        if !done || !task.is_recurring() {
            return Ok(completion);
        }
        let Some(next_due) = next_occurrence(task.due, &task.repeat) else {
            return Ok(completion);
        };

        let mut next = task.clone();
        next.id = self.generate_task_id();
        next.created = now;
        next.completed = None;
        next.due = Some(next_due);
        let mut subtasks = Vec::with_capacity(next.subtasks.len());
        for subtask in &next.subtasks {
            let sub_id = self.generate_subtask_id(&subtasks);
            subtasks.push(Subtask {
                id: sub_id,
                title: subtask.title.clone(),
                done: false,
            });
        }
        next.subtasks = subtasks;

        debug!(task = %id, next = %next.id, due = %next_due, "Next occurrence spawned");
        self.tasks.push(next.clone());
        completion.next = Some(next);
        Ok(completion)
    }

    /// Append a subtask to a task
    pub fn add_subtask(&mut self, task_id: &str, title: &str) -> TaskResult<Subtask> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        let existing = self
            .get(task_id)
            .map(|t| t.subtasks.clone())
            .ok_or_else(|| TaskError::TaskNotFound(task_id.to_string()))?;
        let subtask = Subtask {
            id: self.generate_subtask_id(&existing),
            title: title.to_string(),
            done: false,
        };
        self.get_mut(task_id)?.subtasks.push(subtask.clone());
        Ok(subtask)
    }

    pub fn subtask(&self, task_id: &str, subtask_id: &str) -> TaskResult<&Subtask> {
        self.get(task_id)
            .ok_or_else(|| TaskError::TaskNotFound(task_id.to_string()))?
            .subtasks
            .iter()
            .find(|s| s.id == subtask_id)
            .ok_or_else(|| TaskError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id: subtask_id.to_string(),
            })
    }

    fn subtask_mut(&mut self, task_id: &str, subtask_id: &str) -> TaskResult<&mut Subtask> {
        self.get_mut(task_id)?
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or_else(|| TaskError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id: subtask_id.to_string(),
            })
    }

    pub fn set_subtask_done(
        &mut self,
        task_id: &str,
        subtask_id: &str,
        done: bool,
    ) -> TaskResult<&Subtask> {
        let subtask = self.subtask_mut(task_id, subtask_id)?;
        subtask.done = done;
        Ok(&*subtask)
    }

    pub fn rename_subtask(
        &mut self,
        task_id: &str,
        subtask_id: &str,
        title: &str,
    ) -> TaskResult<&Subtask> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        let subtask = self.subtask_mut(task_id, subtask_id)?;
        subtask.title = title.to_string();
        Ok(&*subtask)
    }

    pub fn delete_subtask(&mut self, task_id: &str, subtask_id: &str) -> TaskResult<Subtask> {
        let task = self.get_mut(task_id)?;
        let pos = task
            .subtasks
            .iter()
            .position(|s| s.id == subtask_id)
            .ok_or_else(|| TaskError::SubtaskNotFound {
                task_id: task_id.to_string(),
                subtask_id: subtask_id.to_string(),
            })?;
        Ok(task.subtasks.remove(pos))
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Query of a saved filter by ID or name, or of a preset by name
    ///
    /// Names compare case-insensitively. Saved filters shadow presets of the
    /// same name.
    pub fn filter_query(&self, id_or_name: &str) -> TaskResult<&str> {
        self.filters
            .iter()
            .find(|f| f.id == id_or_name)
            .or_else(|| {
                self.filters
                    .iter()
                    .find(|f| f.name.eq_ignore_ascii_case(id_or_name))
            })
            .map(|f| f.query.as_str())
            .or_else(|| {
                FILTER_PRESETS
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(id_or_name))
                    .map(|(_, query)| *query)
            })
            .ok_or_else(|| TaskError::FilterNotFound(id_or_name.to_string()))
    }

    /// Save a named query
    pub fn save_filter(&mut self, name: &str, query: &str) -> TaskResult<&Filter> {
        let (name, query) = (name.trim(), query.trim());
        if name.is_empty() || query.is_empty() {
            return Err(TaskError::EmptyFilter);
        }
        let id = loop {
            let id = format!("filter-{}", self.next_counter());
            if !self.filters.iter().any(|f| f.id == id) {
                break id;
            }
        };
        self.filters.push(Filter {
            id,
            name: name.to_string(),
            query: query.to_string(),
        });
        Ok(&self.filters[self.filters.len() - 1])
    }

    pub fn delete_filter(&mut self, id: &str) -> TaskResult<Filter> {
        let pos = self
            .filters
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| TaskError::FilterNotFound(id.to_string()))?;
        Ok(self.filters.remove(pos))
    }

    /// Tasks shown in a view, narrowed by a query and sorted
    ///
    /// A blank query does not filter. Sorting is stable, so tasks that compare
    /// equal keep their collection order.
    pub fn view(&self, view: View, query: &str, sort: SortKey, now: NaiveDateTime) -> Vec<&Task> {
        let query = Query::parse(query.trim());
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| view.includes(t, now))
            .filter(|t| query.is_empty() || query.matches(t, now))
            .collect();
        tasks.sort_by(|a, b| sort.compare(a, b));
        tasks
    }

    /// Tag usage counts, most used first, at most [`MAX_TAG_CLOUD`] entries
    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for tag in self.tasks.iter().flat_map(|t| t.tags.iter()) {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(MAX_TAG_CLOUD);
        counts
    }

    /// The Sunday-to-Saturday week containing `day`, with the tasks due on each day
    pub fn calendar_week(&self, day: NaiveDate) -> Vec<CalendarDay<'_>> {
        let offset = u64::from(day.weekday().num_days_from_sunday());
        let start = day.checked_sub_days(Days::new(offset)).unwrap_or(day);
        start
            .iter_days()
            .take(7)
            .map(|date| CalendarDay {
                date,
                tasks: self
                    .tasks
                    .iter()
                    .filter(|t| t.due.is_some_and(|due| due.date() == date))
                    .collect(),
            })
            .collect()
    }

    /// Move a task's due date to the given day at [`RESCHEDULE_HOUR`]
    pub fn reschedule(&mut self, id: &str, date: NaiveDate) -> TaskResult<NaiveDateTime> {
        let due = date.and_time(NaiveTime::from_hms_opt(RESCHEDULE_HOUR, 0, 0).unwrap_or_default());
        self.get_mut(id)?.due = Some(due);
        Ok(due)
    }

    /// Reset daily and weekly checklists when a new period has started
    ///
    /// Meant to run once at startup. The current period keys are recorded in
    /// the store; the caller persists them.
    pub fn ensure_checklists(&mut self, now: NaiveDateTime) -> Vec<ChecklistReset> {
        vec![
            checklist::apply_period(&mut self.tasks, ChecklistKind::Daily, &mut self.daily_key, now),
            checklist::apply_period(
                &mut self.tasks,
                ChecklistKind::Weekly,
                &mut self.weekly_key,
                now,
            ),
        ]
    }
}
