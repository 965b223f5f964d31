//! MCP tool handlers for the focus server
//!
//! Each file groups the handlers of related tools. Handlers parse string
//! arguments, call the task store, persist and format the response.

pub mod backup;
pub mod calendar;
pub mod list;
pub mod subtasks;
pub mod tasks;
