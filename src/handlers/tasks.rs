//! Task lifecycle handlers for the focus MCP server

use crate::FocusServerHandler;
use crate::focus::{Reminder, TaskDraft, TaskEdit};
use crate::formatting;
use crate::validation;
use mcp_attr::{Result as McpResult, bail, bail_public};
use tracing::info;

impl FocusServerHandler {
    /// **Capture**: Create a task from tool arguments.
    ///
    /// Giving `remind_minutes` enables the reminder with that offset.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_add_task(
        &self,
        title: String,
        id: Option<String>,
        notes: Option<String>,
        due: Option<String>,
        priority: Option<String>,
        tags: Option<String>,
        list: Option<String>,
        repeat: Option<String>,
        rule: Option<String>,
        remind_minutes: Option<u32>,
    ) -> McpResult<String> {
        let due = match due.as_deref() {
            Some(d) => validation::parse_due_edit(d)?,
            None => None,
        };
        let priority = priority
            .as_deref()
            .map(validation::parse_priority)
            .transpose()?;
        let list = match list.as_deref() {
            Some(l) => validation::parse_list(l)?,
            None => None,
        };
        let repeat = match (repeat.as_deref(), rule.as_deref()) {
            (Some(mode), rule) => Some(validation::parse_repeat(mode, rule)?),
            (None, Some(rule)) => Some(validation::parse_repeat("custom", Some(rule))?),
            (None, None) => None,
        };

        let draft = TaskDraft {
            id: id.map(|id| validation::normalize_task_id(&id)),
            title: Some(title),
            notes,
            due,
            priority,
            tags,
            list,
            repeat,
            remind: remind_minutes.map(|minutes| Reminder {
                enabled: true,
                minutes_before: minutes,
            }),
        };

        let now = self.clock.now();
        let mut data = self.lock_data()?;
        let created = match data.create_task(draft, now) {
            Ok(task) => formatting::format_task(task, false),
            Err(e) => {
                drop(data);
                bail_public!(_, "{}", e);
            }
        };
        drop(data);

        if let Err(e) = self.save_data() {
            bail!("Failed to save: {}", e);
        }

        Ok(format!("Task created:\n{}", created))
    }

    /// **Clarify**: Apply a detail edit.
    ///
    /// An empty `due` or `list` clears the field. A `rule` without `repeat`
    /// switches the task to a custom repeat.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_update_task(
        &self,
        id: String,
        title: Option<String>,
        notes: Option<String>,
        due: Option<String>,
        priority: Option<String>,
        tags: Option<String>,
        list: Option<String>,
        repeat: Option<String>,
        rule: Option<String>,
        remind: Option<bool>,
        remind_minutes: Option<u32>,
    ) -> McpResult<String> {
        let id = validation::normalize_task_id(&id);
        let edit = TaskEdit {
            title,
            notes,
            due: due
                .as_deref()
                .map(validation::parse_due_edit)
                .transpose()?,
            priority: priority
                .as_deref()
                .map(validation::parse_priority)
                .transpose()?,
            tags,
            list: list.as_deref().map(validation::parse_list).transpose()?,
            repeat: match (repeat.as_deref(), rule.as_deref()) {
                (Some(mode), rule) => Some(validation::parse_repeat(mode, rule)?),
                (None, Some(rule)) => Some(validation::parse_repeat("custom", Some(rule))?),
                (None, None) => None,
            },
            remind_enabled: remind,
            remind_minutes,
        };

        let mut data = self.lock_data()?;
        let updated = match data.update_task(&id, edit) {
            Ok(task) => formatting::format_task(task, false),
            Err(e) => {
                drop(data);
                bail_public!(_, "{}", e);
            }
        };
        drop(data);

        if let Err(e) = self.save_data() {
            bail!("Failed to save: {}", e);
        }

        Ok(format!("Task updated:\n{}", updated))
    }

    /// **Do**: Complete or reopen a task, spawning the next occurrence of a
    /// repeating task.
    pub async fn handle_complete_task(&self, id: String, done: Option<bool>) -> McpResult<String> {
        let id = validation::normalize_task_id(&id);
        let now = self.clock.now();

        let mut data = self.lock_data()?;
        let completion = match data.set_completed(&id, done.unwrap_or(true), now) {
            Ok(c) => c,
            Err(e) => {
                drop(data);
                bail_public!(_, "{}", e);
            }
        };
        drop(data);

        if let Err(e) = self.save_data() {
            bail!("Failed to save: {}", e);
        }

        if let Some(next) = &completion.next {
            info!(task = %completion.task_id, next = %next.id, "Recurring task rolled over");
        }
        Ok(formatting::format_completion(&completion))
    }

    /// **Purge**: Delete a task with its subtasks.
    pub async fn handle_delete_task(&self, id: String) -> McpResult<String> {
        let id = validation::normalize_task_id(&id);

        let mut data = self.lock_data()?;
        let removed = match data.delete_task(&id) {
            Ok(task) => task,
            Err(e) => {
                drop(data);
                bail_public!(_, "{}", e);
            }
        };
        drop(data);

        if let Err(e) = self.save_data() {
            bail!("Failed to save: {}", e);
        }

        Ok(format!("Task {} deleted: {}", removed.id, removed.title))
    }
}
