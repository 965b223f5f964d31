//! JSON backup of tasks and saved filters
//!
//! A backup is a pretty-printed object `{ "tasks": [...], "filters": [...] }`.
//! Importing replaces each section that is present as an array and leaves
//! the other one alone. Nothing changes unless the whole file is valid.

use super::error::{TaskError, TaskResult};
use super::task::{Filter, Task, normalize_tag};
use super::task_store::TaskStore;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::info;

#[derive(Serialize)]
struct Backup<'a> {
    tasks: &'a [Task],
    filters: &'a [Filter],
}

/// Sections replaced by an import; `None` means the section was absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub tasks: Option<usize>,
    pub filters: Option<usize>,
}

fn invalid(message: impl Into<String>) -> TaskError {
    TaskError::InvalidBackup(message.into())
}

/// Deserialize the array stored under `key`, if there is one
fn section<T: serde::de::DeserializeOwned>(
    backup: &mut serde_json::Map<String, Value>,
    key: &str,
) -> TaskResult<Option<Vec<T>>> {
    match backup.remove(key) {
        Some(value @ Value::Array(_)) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| invalid(format!("{}: {}", key, e))),
        _ => Ok(None),
    }
}

impl TaskStore {
    /// Serialize every task and saved filter as pretty JSON
    pub fn export_backup(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Backup {
            tasks: &self.tasks,
            filters: &self.filters,
        })
    }

    /// Replace tasks and/or filters with the contents of a backup
    ///
    /// Tags are normalized on the way in. Duplicate task or filter IDs, and a
    /// file with neither section, are rejected.
    pub fn import_backup(&mut self, text: &str) -> TaskResult<ImportSummary> {
        let mut backup = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(invalid("expected a JSON object")),
            Err(e) => return Err(invalid(e.to_string())),
        };

        let mut tasks: Option<Vec<Task>> = section(&mut backup, "tasks")?;
        let filters: Option<Vec<Filter>> = section(&mut backup, "filters")?;
        if tasks.is_none() && filters.is_none() {
            return Err(invalid("no tasks or filters array"));
        }

        if let Some(tasks) = tasks.as_mut() {
            let mut seen = HashSet::new();
            for task in tasks.iter_mut() {
                if !seen.insert(task.id.clone()) {
                    return Err(invalid(format!("duplicate task ID '{}'", task.id)));
                }
                task.tags = task.tags.iter().filter_map(|t| normalize_tag(t)).collect();
            }
        }
        if let Some(filters) = filters.as_ref() {
            let mut seen = HashSet::new();
            if let Some(dup) = filters.iter().find(|f| !seen.insert(f.id.as_str())) {
                return Err(invalid(format!("duplicate filter ID '{}'", dup.id)));
            }
        }

        let summary = ImportSummary {
            tasks: tasks.as_ref().map(Vec::len),
            filters: filters.as_ref().map(Vec::len),
        };
        if let Some(tasks) = tasks {
            self.tasks = tasks;
        }
        if let Some(filters) = filters {
            self.filters = filters;
        }

        info!(
            tasks = ?summary.tasks,
            filters = ?summary.filters,
            "Backup imported"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::task_store::TaskDraft;
    use chrono::{NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn sample_store() -> TaskStore {
        let mut store = TaskStore::new();
        store
            .create_task(
                TaskDraft {
                    title: Some("Report".to_string()),
                    tags: Some("work".to_string()),
                    ..Default::default()
                },
                now(),
            )
            .unwrap();
        store.add_subtask("task-1", "Outline").unwrap();
        store.save_filter("Work", "tag:work").unwrap();
        store
    }

    #[test]
    fn test_export_then_import_restores_collection() {
        let source = sample_store();
        let json = source.export_backup().unwrap();
        assert!(json.contains("\"tasks\""));
        assert!(json.contains("\"filters\""));

        let mut target = TaskStore::new();
        let summary = target.import_backup(&json).unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                tasks: Some(1),
                filters: Some(1)
            }
        );
        assert_eq!(target.tasks(), source.tasks());
        assert_eq!(target.filters(), source.filters());
    }

    #[test]
    fn test_import_keeps_missing_section() {
        let mut store = sample_store();
        let summary = store.import_backup(r#"{"tasks": []}"#).unwrap();

        assert_eq!(summary.tasks, Some(0));
        assert_eq!(summary.filters, None);
        assert!(store.tasks().is_empty());
        assert_eq!(store.filters().len(), 1);
    }

    #[test]
    fn test_import_normalizes_tags() {
        let mut store = TaskStore::new();
        store
            .import_backup(
                r#"{"tasks": [{"id": "a", "created": "2026-10-19T09:00:00", "tags": [" Work ", "", "work"]}]}"#,
            )
            .unwrap();

        let task = store.get("a").unwrap();
        assert_eq!(task.title, "New task");
        assert_eq!(task.tags.iter().collect::<Vec<_>>(), vec!["work"]);
    }

    #[test]
    fn test_generated_ids_skip_imported_ones() {
        let mut store = TaskStore::new();
        store
            .import_backup(
                r#"{"tasks": [{"id": "task-1", "created": "2026-10-19T09:00:00"}],
                    "filters": [{"id": "filter-3", "name": "Work", "query": "tag:work"}]}"#,
            )
            .unwrap();

        let task_id = store.create_task(TaskDraft::default(), now()).unwrap().id.clone();
        assert_eq!(task_id, "task-2");
        let filter_id = store.save_filter("Home", "tag:home").unwrap().id.clone();
        assert_eq!(filter_id, "filter-4");
    }

    #[test]
    fn test_invalid_backups_leave_store_unchanged() {
        let mut store = sample_store();
        let before = store.clone();

        for text in [
            "not json",
            "[1, 2]",
            r#"{"notes": []}"#,
            r#"{"tasks": [{"title": "no id"}], "filters": []}"#,
            r#"{"tasks": [{"id": "a", "created": "2026-10-19T09:00:00"}, {"id": "a", "created": "2026-10-19T09:00:00"}]}"#,
            r#"{"tasks": [], "filters": [{"id": "f", "name": "A", "query": "x"}, {"id": "f", "name": "B", "query": "y"}]}"#,
        ] {
            assert!(
                matches!(store.import_backup(text), Err(TaskError::InvalidBackup(_))),
                "accepted: {}",
                text
            );
            assert_eq!(store.tasks(), before.tasks());
            assert_eq!(store.filters(), before.filters());
        }
    }
}
