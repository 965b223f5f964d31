//! Backup handlers for the focus MCP server

use crate::FocusServerHandler;
use mcp_attr::{Result as McpResult, bail, bail_public};
use std::fs;

impl FocusServerHandler {
    /// **Backup**: Write every task and saved filter to a JSON file.
    pub async fn handle_export_backup(&self, path: String) -> McpResult<String> {
        let path = path.trim();
        if path.is_empty() {
            bail_public!(_, "Backup path must not be empty");
        }

        let data = self.lock_data()?;
        let (tasks, filters) = (data.task_count(), data.filters().len());
        let json = match data.export_backup() {
            Ok(json) => json,
            Err(e) => {
                drop(data);
                bail!("Failed to serialize backup: {}", e);
            }
        };
        drop(data);

        if let Err(e) = fs::write(path, json) {
            bail_public!(_, "Failed to write backup '{}': {}", path, e);
        }

        Ok(format!(
            "Exported {} task(s) and {} filter(s) to {}",
            tasks, filters, path
        ))
    }

    /// **Backup**: Replace tasks and/or filters with the contents of a JSON backup.
    pub async fn handle_import_backup(&self, path: String) -> McpResult<String> {
        let path = path.trim();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                bail_public!(_, "Failed to read backup '{}': {}", path, e);
            }
        };

        let mut data = self.lock_data()?;
        let summary = match data.import_backup(&text) {
            Ok(summary) => summary,
            Err(e) => {
                drop(data);
                bail_public!(_, "{}", e);
            }
        };
        drop(data);

        if let Err(e) = self.save_data() {
            bail!("Failed to save: {}", e);
        }

        let section = |count: Option<usize>, name: &str| match count {
            Some(n) => format!("{} {}(s) imported", n, name),
            None => format!("{}s kept", name),
        };
        Ok(format!(
            "Backup {} loaded: {}, {}",
            path,
            section(summary.tasks, "task"),
            section(summary.filters, "filter")
        ))
    }
}
