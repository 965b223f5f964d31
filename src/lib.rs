//! Focus MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for personal
//! task management: tasks with due dates, priorities, tags, subtasks and
//! recurrence rules, daily/weekly checklists, a quick query language, a
//! calendar week, local reminders and JSON backups.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `FocusServerHandler` - Handles MCP protocol communication
//! - **Domain Layer**: `focus` module - Task models, recurrence, queries and checklists
//! - **Persistence Layer**: `storage` module - File-based TOML storage
//!
//! The `scheduler` module runs the reminder loop next to the server.
//!
//! # Example
//!
//! ```no_run
//! use focus_mcp::FocusServerHandler;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = FocusServerHandler::new("tasks.toml")?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod focus;
pub mod formatting;
pub mod handlers;
pub mod logging;
pub mod scheduler;
pub mod storage;
pub mod validation;

use anyhow::{Result, anyhow};
use mcp_attr::server::{McpServer, mcp_server};
use mcp_attr::{Result as McpResult, bail};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

pub use focus::{Clock, FixedClock, SystemClock, Task, TaskStore};
pub use storage::Storage;

/// MCP Server handler for task management
///
/// All changes are persisted to a TOML file after every mutating tool call.
/// The store is shared through an `Arc` so the reminder loop can read it
/// while the server is running.
pub struct FocusServerHandler {
    pub(crate) data: Arc<Mutex<TaskStore>>,
    pub(crate) storage: Storage,
    pub(crate) clock: Arc<dyn Clock>,
}

impl FocusServerHandler {
    /// Create a new server handler using the system clock
    ///
    /// Loads the data file, resets daily/weekly checklists when a new period
    /// has started and saves the updated period keys.
    pub fn new(storage_path: &str) -> Result<Self> {
        Self::with_clock(storage_path, Arc::new(SystemClock))
    }

    /// Create a new server handler with an explicit clock
    pub fn with_clock(storage_path: &str, clock: Arc<dyn Clock>) -> Result<Self> {
        let storage = Storage::new(storage_path);
        let mut data = storage.load()?;

        let resets = data.ensure_checklists(clock.now());
        storage.save(&data)?;
        info!(
            path = %storage.file_path().display(),
            checklist_resets = resets.iter().filter(|r| r.reset).count(),
            "Loaded {}",
            data
        );

        Ok(Self {
            data: Arc::new(Mutex::new(data)),
            storage,
            clock,
        })
    }

    /// Shared handle to the task store, used by the reminder loop
    pub fn data_handle(&self) -> Arc<Mutex<TaskStore>> {
        Arc::clone(&self.data)
    }

    /// The clock used for every time-dependent operation
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub(crate) fn lock_data(&self) -> McpResult<MutexGuard<'_, TaskStore>> {
        match self.data.lock() {
            Ok(data) => Ok(data),
            Err(_) => {
                bail!("Task data is unavailable after an earlier failure");
            }
        }
    }

    /// Save the task store
    pub(crate) fn save_data(&self) -> Result<()> {
        let data = self
            .data
            .lock()
            .map_err(|_| anyhow!("Task data lock poisoned"))?;
        self.storage.save(&data)?;
        Ok(())
    }
}

/// Personal task manager with checklists, recurrence, saved filters and reminders.
///
/// Key concepts:
/// - **views**: inbox (all tasks), today, upcoming (next 7 days), daily, weekly
/// - **lists**: a task on the daily or weekly checklist is unchecked again when a new day/week starts
/// - **repeat**: completing a repeating task creates the next occurrence
/// - **query**: `tag:work`, `due:today|upcoming|overdue`, `priority:high|1`, `list:daily|weekly|none`,
///   `"quoted phrase"`, any other word searches title and notes (all terms must match)
///
/// Task IDs use format: task-1, task-2 (or any unique string given at creation)
#[mcp_server]
impl McpServer for FocusServerHandler {
    /// **Capture**: Create a task. Everything except the title is optional.
    /// **Repeat**: none/daily/weekdays/weekly/monthly/custom; custom needs rule like "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE".
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn add_task(
        &self,
        /// Title: brief description ("New task" when empty)
        title: String,
        /// ID: any unique string; generated when omitted (optional)
        id: Option<String>,
        /// Notes: free text details (optional)
        notes: Option<String>,
        /// Due: YYYY-MM-DD HH:MM or YYYY-MM-DD (optional)
        due: Option<String>,
        /// Priority: high/medium/low or 1/2/3 (optional, default medium)
        priority: Option<String>,
        /// Tags: comma-separated, e.g. "work, urgent" (optional)
        tags: Option<String>,
        /// List: daily/weekly/none checklist (optional)
        list: Option<String>,
        /// Repeat: none/daily/weekdays/weekly/monthly/custom (optional)
        repeat: Option<String>,
        /// Rule: custom repeat rule, e.g. "FREQ=MONTHLY;INTERVAL=3" (optional)
        rule: Option<String>,
        /// Remind: minutes before due to fire a reminder; enables the reminder (optional)
        remind_minutes: Option<u32>,
    ) -> McpResult<String> {
        self.handle_add_task(
            title,
            id,
            notes,
            due,
            priority,
            tags,
            list,
            repeat,
            rule,
            remind_minutes,
        )
        .await
    }

    /// **Clarify**: Edit task details. Only given fields change.
    /// **Tip**: Use empty string "" to clear due or list.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn update_task(
        &self,
        /// ID of task to update
        id: String,
        /// New title; empty becomes "Untitled" (optional)
        title: Option<String>,
        /// New notes (optional)
        notes: Option<String>,
        /// Due YYYY-MM-DD HH:MM, ""=clear (optional)
        due: Option<String>,
        /// Priority: high/medium/low or 1/2/3 (optional)
        priority: Option<String>,
        /// Tags: comma-separated, replaces all tags (optional)
        tags: Option<String>,
        /// List: daily/weekly, ""/none=clear (optional)
        list: Option<String>,
        /// Repeat: none/daily/weekdays/weekly/monthly/custom (optional)
        repeat: Option<String>,
        /// Rule: custom repeat rule, used with repeat=custom (optional)
        rule: Option<String>,
        /// Reminder on/off (optional)
        remind: Option<bool>,
        /// Reminder minutes before due (optional)
        remind_minutes: Option<u32>,
    ) -> McpResult<String> {
        self.handle_update_task(
            id,
            title,
            notes,
            due,
            priority,
            tags,
            list,
            repeat,
            rule,
            remind,
            remind_minutes,
        )
        .await
    }

    /// **Do**: Mark a task done (or not done). Completing a repeating task creates its next occurrence.
    #[tool]
    async fn complete_task(
        &self,
        /// ID of task
        id: String,
        /// Done flag (optional, default true; false reopens)
        done: Option<bool>,
    ) -> McpResult<String> {
        self.handle_complete_task(id, done).await
    }

    /// **Purge**: Permanently delete a task and its subtasks.
    #[tool]
    async fn delete_task(
        &self,
        /// ID of task to delete
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_task(id).await
    }

    /// **Break down**: Add a subtask (checklist step) to a task.
    #[tool]
    async fn add_subtask(
        &self,
        /// ID of parent task
        task_id: String,
        /// Subtask title
        title: String,
    ) -> McpResult<String> {
        self.handle_add_subtask(task_id, title).await
    }

    /// **Break down**: Check off or rename a subtask.
    #[tool]
    async fn update_subtask(
        &self,
        /// ID of parent task
        task_id: String,
        /// ID of subtask
        subtask_id: String,
        /// Done flag (optional)
        done: Option<bool>,
        /// New title (optional)
        title: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_subtask(task_id, subtask_id, done, title)
            .await
    }

    /// **Break down**: Remove a subtask.
    #[tool]
    async fn delete_subtask(
        &self,
        /// ID of parent task
        task_id: String,
        /// ID of subtask
        subtask_id: String,
    ) -> McpResult<String> {
        self.handle_delete_subtask(task_id, subtask_id).await
    }

    /// **Review**: List tasks in a view, narrowed by a query or saved filter, sorted.
    /// **Use**: view=today every morning; view=daily for the daily checklist; query="tag:work due:overdue".
    #[tool]
    async fn list(
        &self,
        /// View: inbox/today/upcoming/daily/weekly (optional, default inbox)
        view: Option<String>,
        /// Query: e.g. "tag:work priority:high report" (optional)
        query: Option<String>,
        /// Saved filter ID or name, or a preset name like "Urgent"; combined with query (optional)
        filter: Option<String>,
        /// Sort: created/priority/due/title (optional, default created)
        sort: Option<String>,
        /// Exclude notes from output (optional, default false)
        exclude_notes: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list(view, query, filter, sort, exclude_notes)
            .await
    }

    /// **Plan**: Show the Sunday-to-Saturday week containing a date with the tasks due each day.
    #[tool]
    async fn calendar(
        &self,
        /// Date YYYY-MM-DD (optional, default today)
        date: Option<String>,
    ) -> McpResult<String> {
        self.handle_calendar(date).await
    }

    /// **Plan**: Move a task to another day; its due time becomes 09:00.
    #[tool]
    async fn reschedule(
        &self,
        /// ID of task
        id: String,
        /// Date YYYY-MM-DD
        date: String,
    ) -> McpResult<String> {
        self.handle_reschedule(id, date).await
    }

    /// **Review**: Tag cloud with usage counts, most used first.
    #[tool]
    async fn tags(&self) -> McpResult<String> {
        self.handle_tags().await
    }

    /// **Organize**: Save a query under a name for reuse with list(filter=...).
    #[tool]
    async fn save_filter(
        &self,
        /// Display name
        name: String,
        /// Query, e.g. "priority:1 due:today"
        query: String,
    ) -> McpResult<String> {
        self.handle_save_filter(name, query).await
    }

    /// **Organize**: Delete a saved filter.
    #[tool]
    async fn delete_filter(
        &self,
        /// ID of filter
        id: String,
    ) -> McpResult<String> {
        self.handle_delete_filter(id).await
    }

    /// **Organize**: List saved filters (presets when none are saved).
    #[tool]
    async fn filters(&self) -> McpResult<String> {
        self.handle_filters().await
    }

    /// **Backup**: Export all tasks and saved filters to a JSON file.
    #[tool]
    async fn export_backup(
        &self,
        /// Path of the JSON file to write (overwritten if it exists)
        path: String,
    ) -> McpResult<String> {
        self.handle_export_backup(path).await
    }

    /// **Restore**: Load a JSON backup. Its tasks and/or filters replace the current ones.
    /// **Caution**: A section missing from the file is kept; an invalid file changes nothing.
    #[tool]
    async fn import_backup(
        &self,
        /// Path of the JSON file to read
        path: String,
    ) -> McpResult<String> {
        self.handle_import_backup(path).await
    }
}
