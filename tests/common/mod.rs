//! Common test utilities for integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use focus_mcp::{FixedClock, FocusServerHandler};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Monday 2026-10-19 09:00, the instant every test handler sees
pub fn test_now() -> NaiveDateTime {
    at(2026, 10, 19, 9, 0)
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Create a test handler with temporary storage and a fixed clock
pub fn get_test_handler() -> (FocusServerHandler, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let handler = handler_at(&temp_file, test_now());
    (handler, temp_file)
}

/// Open a handler on an existing file at the given instant
pub fn handler_at(file: &NamedTempFile, now: NaiveDateTime) -> FocusServerHandler {
    FocusServerHandler::with_clock(file.path().to_str().unwrap(), Arc::new(FixedClock(now)))
        .unwrap()
}

/// Add a task with only a title and return its ID
pub async fn add_simple_task(handler: &FocusServerHandler, title: &str) -> String {
    let response = handler
        .handle_add_task(
            title.to_string(),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        )
        .await
        .unwrap();
    extract_id_from_response(&response)
}

/// Extract the task ID from an add_task response
/// Response format: "Task created:\n- [ ] <id> <title> (priority: ...)"
pub fn extract_id_from_response(response: &str) -> String {
    response
        .lines()
        .find_map(|line| line.strip_prefix("- [ ] "))
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or("")
        .to_string()
}
