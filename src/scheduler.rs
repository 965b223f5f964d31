//! Background reminder loop
//!
//! Every tick selects the reminders whose fire time fell inside the last
//! window and logs them under [`REMINDER_TARGET`].

use crate::focus::{Clock, TaskStore, due_reminders};
use crate::logging::REMINDER_TARGET;
use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

/// A reminder fired by one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredReminder {
    pub task_id: String,
    pub title: String,
    pub due: NaiveDateTime,
}

/// Reminders firing at `now`, copied out so the lock is released right away
pub fn check_reminders(data: &Mutex<TaskStore>, now: NaiveDateTime) -> Result<Vec<FiredReminder>> {
    let data = data
        .lock()
        .map_err(|_| anyhow!("Task data lock poisoned"))?;
    Ok(due_reminders(data.tasks(), now)
        .into_iter()
        .filter_map(|task| {
            task.due.map(|due| FiredReminder {
                task_id: task.id.clone(),
                title: task.title.clone(),
                due,
            })
        })
        .collect())
}

/// Tick forever, logging fired reminders
///
/// The first tick completes immediately, catching reminders that came due
/// while the process was starting.
pub async fn run_reminders(data: Arc<Mutex<TaskStore>>, clock: Arc<dyn Clock>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        match check_reminders(&data, clock.now()) {
            Ok(fired) => {
                for reminder in fired {
                    info!(
                        target: REMINDER_TARGET,
                        task = %reminder.task_id,
                        due = %reminder.due.format("%Y-%m-%d %H:%M"),
                        "Reminder: {}",
                        reminder.title
                    );
                }
            }
            Err(e) => {
                warn!("Stopping reminders: {}", e);
                return;
            }
        }
    }
}
