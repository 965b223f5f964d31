//! Calendar handlers for the focus MCP server

use crate::FocusServerHandler;
use crate::formatting;
use crate::validation;
use mcp_attr::{Result as McpResult, bail, bail_public};

impl FocusServerHandler {
    /// **Plan**: The Sunday-start week around a date, today by default.
    pub async fn handle_calendar(&self, date: Option<String>) -> McpResult<String> {
        let day = match date.as_deref() {
            Some(d) if !d.trim().is_empty() => validation::parse_date(d)?,
            _ => self.clock.now().date(),
        };

        let data = self.lock_data()?;
        let week = data.calendar_week(day);
        Ok(formatting::format_calendar(&week))
    }

    /// **Plan**: Move a task to a calendar day.
    pub async fn handle_reschedule(&self, id: String, date: String) -> McpResult<String> {
        let id = validation::normalize_task_id(&id);
        let day = validation::parse_date(&date)?;

        let mut data = self.lock_data()?;
        let due = match data.reschedule(&id, day) {
            Ok(due) => due,
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
            "Task {} rescheduled to {}",
            id,
            due.format("%Y-%m-%d %H:%M")
        ))
    }
}
