//! Formatting helper functions for the task MCP server
//!
//! This module renders tasks, calendar weeks, tags and filters as plain text
//! for tool responses.

use crate::focus::{
    CalendarDay, Completion, FILTER_PRESETS, Filter, Repeat, SUGGESTIONS, TAG_PRESETS, Task, View,
};
use chrono::NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Format a single task, with its details indented below the headline
pub fn format_task(task: &Task, exclude_notes: bool) -> String {
    let check = if task.is_completed() { "x" } else { " " };
    let mut result = format!(
        "- [{}] {} {} (priority: {})\n",
        check, task.id, task.title, task.priority
    );

    if let Some(due) = task.due {
        result.push_str(&format!("  Due: {}\n", format_timestamp(due)));
    }
    if !task.tags.is_empty() {
        let tags: Vec<String> = task.tags.iter().map(|t| format!("#{}", t)).collect();
        result.push_str(&format!("  Tags: {}\n", tags.join(" ")));
    }
    if let Some(list) = task.list {
        result.push_str(&format!("  List: {}\n", list));
    }
    if task.repeat != Repeat::None {
        result.push_str(&format!("  Repeat: {}\n", task.repeat));
    }
    if task.remind.enabled {
        result.push_str(&format!(
            "  Reminder: {} min before\n",
            task.remind.minutes_before
        ));
    }
    if !exclude_notes && !task.notes.is_empty() {
        result.push_str(&format!("  Notes: {}\n", task.notes));
    }
    for subtask in &task.subtasks {
        let check = if subtask.done { "x" } else { " " };
        result.push_str(&format!("  - [{}] {} {}\n", check, subtask.id, subtask.title));
    }
    if let Some(completed) = task.completed {
        result.push_str(&format!("  Completed: {}\n", format_timestamp(completed)));
    }

    result
}

/// Format the tasks of a view
///
/// An empty inbox lists starter suggestions instead.
pub fn format_tasks(view: View, query: &str, tasks: &[&Task], exclude_notes: bool) -> String {
    let mut result = view.title().to_string();
    if !query.trim().is_empty() {
        result.push_str(&format!(" (filtered by: {})", query.trim()));
    }
    result.push('\n');

    if tasks.is_empty() {
        let hint = match view {
            View::Inbox if query.trim().is_empty() => {
                let mut hint =
                    "No tasks yet. Here are some ideas to get you started:\n".to_string();
                for (title, priority) in SUGGESTIONS {
                    hint.push_str(&format!("- {} (priority: {})\n", title, priority));
                }
                return result + &hint;
            }
            View::Inbox => "No tasks found",
            View::Today => "You have no tasks for today.",
            View::Upcoming => "No upcoming tasks found.",
            View::Daily => "This daily checklist is empty.",
            View::Weekly => "This weekly plan is empty.",
        };
        return format!("{}{}", result, hint);
    }

    result.push_str(&format!("Found {} task(s):\n\n", tasks.len()));
    for task in tasks {
        result.push_str(&format_task(task, exclude_notes));
    }
    result
}

/// Format the outcome of completing or reopening a task
pub fn format_completion(completion: &Completion) -> String {
    let mut result = match completion.completed {
        Some(at) => format!(
            "Task {} completed at {}",
            completion.task_id,
            format_timestamp(at)
        ),
        None => format!("Task {} reopened", completion.task_id),
    };
    if let Some(next) = &completion.next {
        let due = next.due.map(format_timestamp).unwrap_or_default();
        result.push_str(&format!("\nNext occurrence created: {} due {}", next.id, due));
    }
    result
}

/// Format a Sunday-to-Saturday calendar week
pub fn format_calendar(days: &[CalendarDay<'_>]) -> String {
    let mut result = String::new();
    for day in days {
        result.push_str(&format!("{}\n", day.date.format("%a %b %-d")));
        if day.tasks.is_empty() {
            result.push_str("  (nothing due)\n");
        }
        for task in &day.tasks {
            let time = task
                .due
                .map(|due| due.format("%H:%M").to_string())
                .unwrap_or_default();
            let check = if task.is_completed() { "x" } else { " " };
            result.push_str(&format!("  - [{}] {} {} {}\n", check, time, task.id, task.title));
        }
    }
    result
}

/// Format the tag cloud, or the preset tags when none are in use
pub fn format_tags(counts: &[(String, usize)]) -> String {
    if counts.is_empty() {
        let presets: Vec<String> = TAG_PRESETS.iter().map(|t| format!("#{}", t)).collect();
        return format!(
            "No tags in use yet. Try one of: {}\nSearch a tag with the query tag:<name>",
            presets.join(" ")
        );
    }
    let mut result = format!("Found {} tag(s):\n", counts.len());
    for (tag, count) in counts {
        result.push_str(&format!("- #{} ({})\n", tag, count));
    }
    result
}

/// Format saved filters, or the preset filters when none are saved
pub fn format_filters(filters: &[Filter]) -> String {
    if filters.is_empty() {
        let mut result = "No saved filters. Presets:\n".to_string();
        for (name, query) in FILTER_PRESETS {
            result.push_str(&format!("- {}: {}\n", name, query));
        }
        return result;
    }
    let mut result = format!("Found {} filter(s):\n", filters.len());
    for filter in filters {
        result.push_str(&format!("- [{}] {}: {}\n", filter.id, filter.name, filter.query));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::{ChecklistKind, Priority, RecurrenceRule, Subtask};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_format_task_details() {
        let mut task = Task::new("task-1", at(8, 0));
        task.title = "Pay rent".to_string();
        task.notes = "Transfer".to_string();
        task.due = Some(at(9, 30));
        task.priority = Priority::High;
        task.tags = ["home".to_string()].into_iter().collect();
        task.list = Some(ChecklistKind::Weekly);
        task.repeat = Repeat::Custom {
            rrule: RecurrenceRule::parse("FREQ=WEEKLY;INTERVAL=2"),
        };
        task.subtasks.push(Subtask {
            id: "sub-1".to_string(),
            title: "Check balance".to_string(),
            done: true,
        });

        let text = format_task(&task, false);

        assert!(text.starts_with("- [ ] task-1 Pay rent (priority: high)"));
        assert!(text.contains("Due: 2026-10-19 09:30"));
        assert!(text.contains("Tags: #home"));
        assert!(text.contains("List: weekly"));
        assert!(text.contains("Repeat: custom (FREQ=WEEKLY;INTERVAL=2)"));
        assert!(text.contains("Notes: Transfer"));
        assert!(text.contains("- [x] sub-1 Check balance"));

        assert!(!format_task(&task, true).contains("Notes:"));
    }

    #[test]
    fn test_empty_inbox_shows_suggestions() {
        let text = format_tasks(View::Inbox, "", &[], false);
        assert!(text.contains("No tasks yet"));
        assert!(text.contains("Drink Water"));
    }

    #[test]
    fn test_empty_filtered_view() {
        let text = format_tasks(View::Inbox, "tag:work", &[], false);
        assert!(text.contains("filtered by: tag:work"));
        assert!(text.contains("No tasks found"));
        assert!(format_tasks(View::Daily, "", &[], false).contains("daily checklist is empty"));
    }

    #[test]
    fn test_format_tags_presets() {
        assert!(format_tags(&[]).contains("#work"));
        let text = format_tags(&[("home".to_string(), 2)]);
        assert!(text.contains("- #home (2)"));
    }

    #[test]
    fn test_format_filters_presets() {
        assert!(format_filters(&[]).contains("Urgent: priority:1"));
    }
}
