use super::recurrence::Repeat;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Title given to tasks created without one
pub const DEFAULT_TITLE: &str = "New task";

/// Title substituted when an edit leaves the title blank
pub const UNTITLED: &str = "Untitled";

/// Default reminder offset in minutes
pub const DEFAULT_REMIND_MINUTES: u32 = 15;

/// Task importance, ordered from most to least urgent
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Numeric level (1 = high, 2 = medium, 3 = low)
    pub fn level(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Build a priority from a numeric level, clamping into 1..=3
    pub fn from_level(level: i64) -> Self {
        match level.clamp(1, 3) {
            1 => Priority::High,
            2 => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(name)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "1" => Ok(Priority::High),
            "medium" | "2" => Ok(Priority::Medium),
            "low" | "3" => Ok(Priority::Low),
            other => Err(format!(
                "Invalid priority '{}'. Valid options are: high, medium, low (or 1, 2, 3)",
                other
            )),
        }
    }
}

/// Periodic checklist a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistKind {
    Daily,
    Weekly,
}

impl fmt::Display for ChecklistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecklistKind::Daily => f.write_str("daily"),
            ChecklistKind::Weekly => f.write_str("weekly"),
        }
    }
}

impl FromStr for ChecklistKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(ChecklistKind::Daily),
            "weekly" => Ok(ChecklistKind::Weekly),
            other => Err(format!(
                "Invalid list '{}'. Valid options are: daily, weekly, none",
                other
            )),
        }
    }
}

/// Local reminder settings for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reminder {
    pub enabled: bool,
    /// Minutes before the due time at which the reminder fires
    pub minutes_before: u32,
}

impl Default for Reminder {
    fn default() -> Self {
        Self {
            enabled: false,
            minutes_before: DEFAULT_REMIND_MINUTES,
        }
    }
}

/// A checklist item owned by a single task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Identifier, unique within the parent task
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

/// A saved query shown as a named filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub id: String,
    pub name: String,
    pub query: String,
}

/// A single task in the collection
///
/// `id` and `created` are required in stored data; every other field falls
/// back to its default when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique, immutable identifier
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub notes: String,
    /// When the task was created
    pub created: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<NaiveDateTime>,
    /// Completion time; `None` while the task is open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<NaiveDateTime>,
    #[serde(default)]
    pub priority: Priority,
    /// Lowercase, trimmed, non-empty tags
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(default)]
    pub remind: Reminder,
    /// Daily or weekly checklist affinity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<ChecklistKind>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Task {
    /// Create a task with default values
    pub fn new(id: impl Into<String>, created: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            notes: String::new(),
            created,
            due: None,
            completed: None,
            priority: Priority::default(),
            tags: BTreeSet::new(),
            subtasks: Vec::new(),
            repeat: Repeat::None,
            remind: Reminder::default(),
            list: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }

    /// Check if completing this task spawns a follow-up occurrence
    pub fn is_recurring(&self) -> bool {
        !matches!(self.repeat, Repeat::None)
    }

    /// Clear completion of the task and all of its subtasks
    pub fn reopen(&mut self) {
        self.completed = None;
        for subtask in self.subtasks.iter_mut() {
            subtask.done = false;
        }
    }

    /// Text searched by free-text query terms
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.notes)
    }
}

/// Normalize a single tag, returning `None` for blank input
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim().to_lowercase();
    if tag.is_empty() { None } else { Some(tag) }
}

/// Parse a comma-separated tag list into a normalized tag set
pub fn parse_tags(text: &str) -> BTreeSet<String> {
    text.split(',').filter_map(normalize_tag).collect()
}
