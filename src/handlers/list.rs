//! List, tag and saved filter handlers for the focus MCP server

use crate::FocusServerHandler;
use crate::formatting;
use crate::validation;
use mcp_attr::{Result as McpResult, bail, bail_public};

impl FocusServerHandler {
    /// **Review**: Tasks of a view, narrowed by a query and an optional saved
    /// filter, then sorted.
    pub async fn handle_list(
        &self,
        view: Option<String>,
        query: Option<String>,
        filter: Option<String>,
        sort: Option<String>,
        exclude_notes: Option<bool>,
    ) -> McpResult<String> {
        let view = validation::parse_view(view.as_deref())?;
        let sort = validation::parse_sort(sort.as_deref())?;
        let now = self.clock.now();

        let data = self.lock_data()?;

        // A saved or preset filter and an explicit query are combined with AND
        let mut full_query = query.unwrap_or_default();
        if let Some(filter) = filter.as_deref() {
            match data.filter_query(filter.trim()) {
                Ok(filter_query) => full_query = format!("{} {}", filter_query, full_query),
                Err(e) => {
                    drop(data);
                    bail_public!(_, "{}", e);
                }
            }
        }

        let tasks = data.view(view, &full_query, sort, now);
        Ok(formatting::format_tasks(
            view,
            &full_query,
            &tasks,
            exclude_notes.unwrap_or(false),
        ))
    }

    /// **Review**: Tag usage counts.
    pub async fn handle_tags(&self) -> McpResult<String> {
        let data = self.lock_data()?;
        let counts = data.tag_counts();
        drop(data);
        Ok(formatting::format_tags(&counts))
    }

    /// **Organize**: Save a named query.
    pub async fn handle_save_filter(&self, name: String, query: String) -> McpResult<String> {
        let mut data = self.lock_data()?;
        let saved = match data.save_filter(&name, &query) {
            Ok(f) => format!("Filter {} saved: {} = {}", f.id, f.name, f.query),
            Err(e) => {
                drop(data);
                bail_public!(_, "{}", e);
            }
        };
        drop(data);

        if let Err(e) = self.save_data() {
            bail!("Failed to save: {}", e);
        }

        Ok(saved)
    }

    /// **Organize**: Delete a saved filter by ID.
    pub async fn handle_delete_filter(&self, id: String) -> McpResult<String> {
        let mut data = self.lock_data()?;
        let removed = match data.delete_filter(id.trim()) {
            Ok(f) => f,
            Err(e) => {
                drop(data);
                bail_public!(_, "{}", e);
            }
        };
        drop(data);

        if let Err(e) = self.save_data() {
            bail!("Failed to save: {}", e);
        }

        Ok(format!("Filter {} deleted: {}", removed.id, removed.name))
    }

    /// **Organize**: Saved filters, or the presets when none exist.
    pub async fn handle_filters(&self) -> McpResult<String> {
        let data = self.lock_data()?;
        let result = formatting::format_filters(data.filters());
        drop(data);
        Ok(result)
    }
}
