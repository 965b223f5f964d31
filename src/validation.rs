//! Validation helper functions for the task MCP server
//!
//! This module turns the string arguments of MCP tools into domain values,
//! reporting malformed input as `INVALID_PARAMS` errors.

use crate::focus::{ChecklistKind, Priority, Repeat, SortKey, View};
use chrono::{NaiveDate, NaiveDateTime};
use mcp_attr::Result as McpResult;

/// Accepted layouts for due timestamps, tried in order
const DUE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}

/// Parse a calendar date in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> McpResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        invalid_params(format!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2026-03-15')",
            date_str
        ))
    })
}

/// Parse a due timestamp
///
/// Accepts `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM` (optionally with seconds)
/// or a bare date, which means midnight.
pub fn parse_due(due_str: &str) -> McpResult<NaiveDateTime> {
    let trimmed = due_str.trim();
    for format in DUE_FORMATS {
        if let Ok(due) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(due);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }
    Err(invalid_params(format!(
        "Invalid due '{}'. Use YYYY-MM-DD HH:MM or YYYY-MM-DD (e.g., '2026-03-15 09:30')",
        due_str
    )))
}

/// Parse an optional due argument where an empty string clears the due date
pub fn parse_due_edit(due_str: &str) -> McpResult<Option<NaiveDateTime>> {
    if due_str.trim().is_empty() {
        Ok(None)
    } else {
        parse_due(due_str).map(Some)
    }
}

/// Parse a priority given as a name or a numeric level
///
/// Numeric levels outside 1..=3 are clamped into range.
pub fn parse_priority(priority_str: &str) -> McpResult<Priority> {
    if let Ok(level) = priority_str.trim().parse::<i64>() {
        return Ok(Priority::from_level(level));
    }
    priority_str.parse::<Priority>().map_err(invalid_params)
}

/// Parse a checklist affinity; `none` (or an empty string) means no checklist
pub fn parse_list(list_str: &str) -> McpResult<Option<ChecklistKind>> {
    match list_str.trim().to_lowercase().as_str() {
        "" | "none" | "inbox" => Ok(None),
        other => other.parse::<ChecklistKind>().map(Some).map_err(invalid_params),
    }
}

/// Parse a repeat mode together with its custom rule
pub fn parse_repeat(mode: &str, rule: Option<&str>) -> McpResult<Repeat> {
    Repeat::from_mode(mode, rule).map_err(invalid_params)
}

/// Parse a view name, defaulting to the inbox
pub fn parse_view(view_str: Option<&str>) -> McpResult<View> {
    view_str
        .unwrap_or_default()
        .parse::<View>()
        .map_err(invalid_params)
}

/// Parse a sort key, defaulting to creation order
pub fn parse_sort(sort_str: Option<&str>) -> McpResult<SortKey> {
    sort_str
        .unwrap_or_default()
        .parse::<SortKey>()
        .map_err(invalid_params)
}

/// Normalize a task ID by trimming surrounding whitespace
pub fn normalize_task_id(task_id: &str) -> String {
    task_id.trim().to_string()
}
