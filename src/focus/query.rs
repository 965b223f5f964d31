//! Quick query language
//!
//! A query is a list of terms that must all match. Terms are separated by
//! whitespace; a double-quoted phrase forms a single term. Structured terms:
//!
//! - `tag:<name>`
//! - `due:today`, `due:upcoming`, `due:overdue`
//! - `priority:high|medium|low` (or `1|2|3`)
//! - `list:daily`, `list:weekly`, `list:none` (alias `list:inbox`)
//!
//! Anything else is a case-insensitive substring search over title and notes.

use super::task::{ChecklistKind, Priority, Task};
use chrono::{Duration, NaiveDateTime};

/// Width of the `due:upcoming` window
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Relative due-date predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    /// Due on the current local calendar day
    Today,
    /// Due after now and within the next seven days
    Upcoming,
    /// Due at or before now
    Overdue,
}

impl DueFilter {
    pub fn matches(self, due: Option<NaiveDateTime>, now: NaiveDateTime) -> bool {
        let Some(due) = due else {
            return false;
        };
        match self {
            DueFilter::Today => due.date() == now.date(),
            DueFilter::Upcoming => {
                due > now && due <= now + Duration::days(UPCOMING_WINDOW_DAYS)
            }
            DueFilter::Overdue => due <= now,
        }
    }
}

/// A single parsed query term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Tag(String),
    Due(DueFilter),
    /// `None` for an unrecognized priority value, which never matches
    Priority(Option<Priority>),
    /// `None` requires the task to be on no checklist
    List(Option<ChecklistKind>),
    Text(String),
    /// Structured key with a value that imposes no constraint (e.g. `due:later`)
    Any,
}

impl Term {
    fn parse(raw: &str) -> Self {
        let term = raw.trim().to_lowercase();

        if let Some(tag) = term.strip_prefix("tag:") {
            return Term::Tag(tag.to_string());
        }
        if let Some(value) = term.strip_prefix("due:") {
            return match value {
                "today" => Term::Due(DueFilter::Today),
                "upcoming" => Term::Due(DueFilter::Upcoming),
                "overdue" => Term::Due(DueFilter::Overdue),
                _ => Term::Any,
            };
        }
        if let Some(value) = term.strip_prefix("priority:") {
            return Term::Priority(value.parse::<Priority>().ok());
        }
        if let Some(value) = term.strip_prefix("list:") {
            return match value {
                "daily" => Term::List(Some(ChecklistKind::Daily)),
                "weekly" => Term::List(Some(ChecklistKind::Weekly)),
                "none" | "inbox" => Term::List(None),
                _ => Term::Any,
            };
        }
        Term::Text(term)
    }

    fn matches(&self, task: &Task, now: NaiveDateTime) -> bool {
        match self {
            Term::Tag(tag) => task.tags.contains(tag),
            Term::Due(filter) => filter.matches(task.due, now),
            Term::Priority(Some(priority)) => task.priority == *priority,
            Term::Priority(None) => false,
            Term::List(kind) => task.list == *kind,
            Term::Text(text) => task.search_text().to_lowercase().contains(text.as_str()),
            Term::Any => true,
        }
    }
}

/// A parsed query: the conjunction of its terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    terms: Vec<Term>,
}

impl Query {
    pub fn parse(query: &str) -> Self {
        Self {
            terms: tokenize(query).iter().map(|t| Term::parse(t)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check whether every term matches the task
    pub fn matches(&self, task: &Task, now: NaiveDateTime) -> bool {
        self.terms.iter().all(|term| term.matches(task, now))
    }
}

/// Check a task against a query string
pub fn matches(task: &Task, query: &str, now: NaiveDateTime) -> bool {
    Query::parse(query).matches(task, now)
}

/// Split a query string into terms
///
/// `"..."` with at least one character inside is one term without its quotes.
/// Otherwise a term is a run of non-whitespace characters, with one leading
/// and one trailing quote stripped.
pub fn tokenize(query: &str) -> Vec<String> {
    let chars: Vec<char> = query.chars().collect();
    let mut terms = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }

        if chars[i] == '"' {
            let closing = chars[i + 1..].iter().position(|c| *c == '"');
            if let Some(len) = closing.filter(|len| *len > 0) {
                terms.push(chars[i + 1..i + 1 + len].iter().collect());
                i += len + 2;
                continue;
            }
        }

        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() {
            i += 1;
        }
        let word: String = chars[start..i].iter().collect();
        let word = word.strip_prefix('"').unwrap_or(&word);
        let word = word.strip_suffix('"').unwrap_or(word);
        terms.push(word.to_string());
    }

    terms
}
