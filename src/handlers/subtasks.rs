//! Subtask handlers for the focus MCP server

use crate::FocusServerHandler;
use crate::validation;
use mcp_attr::{Result as McpResult, bail, bail_public};

impl FocusServerHandler {
    /// **Break down**: Append a subtask to a task.
    pub async fn handle_add_subtask(&self, task_id: String, title: String) -> McpResult<String> {
        let task_id = validation::normalize_task_id(&task_id);

        let mut data = self.lock_data()?;
        let subtask = match data.add_subtask(&task_id, &title) {
            Ok(s) => s,
            Err(e) => {
                drop(data);
                bail_public!(_, "{}", e);
            }
        };
        drop(data);

        if let Err(e) = self.save_data() {
            bail!("Failed to save: {}", e);
        }

        Ok(format!(
            "Subtask {} added to {}: {}",
            subtask.id, task_id, subtask.title
        ))
    }

    /// **Break down**: Check off and/or rename a subtask.
    pub async fn handle_update_subtask(
        &self,
        task_id: String,
        subtask_id: String,
        done: Option<bool>,
        title: Option<String>,
    ) -> McpResult<String> {
        if done.is_none() && title.is_none() {
            bail_public!(_, "Nothing to update. Provide done and/or title.");
        }
        let task_id = validation::normalize_task_id(&task_id);
        let subtask_id = subtask_id.trim().to_string();

        let mut data = self.lock_data()?;
        let mut result = data.subtask(&task_id, &subtask_id).map(|_| ());
        if let (true, Some(title)) = (result.is_ok(), &title) {
            result = data
                .rename_subtask(&task_id, &subtask_id, title)
                .map(|_| ());
        }
        if let (true, Some(done)) = (result.is_ok(), done) {
            result = data
                .set_subtask_done(&task_id, &subtask_id, done)
                .map(|_| ());
        }
        let summary = result.and_then(|()| {
            data.subtask(&task_id, &subtask_id).map(|s| {
                format!(
                    "Subtask {} updated: [{}] {}",
                    s.id,
                    if s.done { "x" } else { " " },
                    s.title
                )
            })
        });
        drop(data);

        let summary = match summary {
            Ok(s) => s,
            Err(e) => {
                bail_public!(_, "{}", e);
            }
        };

        if let Err(e) = self.save_data() {
            bail!("Failed to save: {}", e);
        }

        Ok(summary)
    }

    /// **Break down**: Remove a subtask.
    pub async fn handle_delete_subtask(
        &self,
        task_id: String,
        subtask_id: String,
    ) -> McpResult<String> {
        let task_id = validation::normalize_task_id(&task_id);

        let mut data = self.lock_data()?;
        let removed = match data.delete_subtask(&task_id, subtask_id.trim()) {
            Ok(s) => s,
            Err(e) => {
                drop(data);
                bail_public!(_, "{}", e);
            }
        };
        drop(data);

        if let Err(e) = self.save_data() {
            bail!("Failed to save: {}", e);
        }

        Ok(format!("Subtask {} deleted from {}", removed.id, task_id))
    }
}
