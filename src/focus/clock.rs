use chrono::{Local, NaiveDateTime};

/// Source of the current local wall-clock time
///
/// Every time-dependent operation (query matching, views, completion,
/// checklist resets, reminders) takes its "now" from a clock so that the
/// results stay deterministic under test.
pub trait Clock: Send + Sync {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the operating system's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
