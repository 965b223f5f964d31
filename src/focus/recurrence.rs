//! Recurrence calculator
//!
//! Computes the next occurrence of a recurring task from its due timestamp.
//! Besides the fixed modes (daily, weekdays, weekly, monthly) a small subset of
//! RFC 5545 recurrence rules is understood:
//!
//! ```text
//! FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE
//! ```
//!
//! Rules are parsed once into a [`RecurrenceRule`]. Parsing never fails;
//! unknown or malformed parts fall back to their defaults.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on single-day steps taken while searching for a `BYDAY` match
pub const MAX_BYDAY_ADVANCE: u32 = 14;

/// Base step of a custom rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

/// Parsed form of a custom recurrence rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// Number of base steps per occurrence (always at least 1)
    pub interval: u32,
    /// Allowed weekdays; `Some(vec![])` when `BYDAY` was given but no code was recognized
    pub by_day: Option<Vec<Weekday>>,
    source: String,
}

impl RecurrenceRule {
    /// Parse a `KEY=VALUE;KEY=VALUE` rule string
    ///
    /// Keys and values are matched case-insensitively. Later keys override
    /// earlier ones. An unknown `FREQ` means DAILY, a missing, non-numeric or
    /// zero `INTERVAL` means 1, and unrecognized `BYDAY` codes are dropped.
    /// An empty `BYDAY` value is treated as absent.
    pub fn parse(rule: &str) -> Self {
        let mut frequency = Frequency::Daily;
        let mut interval = 1;
        let mut by_day = None;

        for part in rule.split(';') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim().to_uppercase();
            match key.trim().to_uppercase().as_str() {
                "FREQ" => {
                    frequency = match value.as_str() {
                        "WEEKLY" => Frequency::Weekly,
                        "MONTHLY" => Frequency::Monthly,
                        _ => Frequency::Daily,
                    };
                }
                "INTERVAL" => {
                    interval = value.parse::<u32>().ok().filter(|n| *n > 0).unwrap_or(1);
                }
                "BYDAY" => {
                    by_day = if value.is_empty() {
                        None
                    } else {
                        Some(value.split(',').filter_map(parse_weekday_code).collect())
                    };
                }
                _ => {}
            }
        }

        Self {
            frequency,
            interval,
            by_day,
            source: rule.trim().to_string(),
        }
    }

    /// Apply the rule to a timestamp
    ///
    /// The frequency/interval step is applied first. With `BYDAY`, the date then
    /// moves forward one day at a time until its weekday is allowed, giving up
    /// after [`MAX_BYDAY_ADVANCE`] days and keeping whatever date it reached.
    pub fn advance(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut next = match self.frequency {
            Frequency::Daily => add_days(from, u64::from(self.interval))?,
            Frequency::Weekly => add_days(from, 7 * u64::from(self.interval))?,
            Frequency::Monthly => add_months_rollover(from, self.interval)?,
        };

        if let Some(days) = &self.by_day {
            let mut tries = 0;
            while !days.contains(&next.weekday()) && tries < MAX_BYDAY_ADVANCE {
                next = add_days(next, 1)?;
                tries += 1;
            }
        }

        Some(next)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<String> for RecurrenceRule {
    fn from(rule: String) -> Self {
        Self::parse(&rule)
    }
}

impl From<RecurrenceRule> for String {
    fn from(rule: RecurrenceRule) -> Self {
        rule.source
    }
}

fn parse_weekday_code(code: &str) -> Option<Weekday> {
    match code.trim() {
        "SU" => Some(Weekday::Sun),
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        _ => None,
    }
}

/// How a task repeats after it is completed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    None,
    Daily,
    /// Every Monday to Friday
    Weekdays,
    Weekly,
    Monthly,
    Custom { rrule: RecurrenceRule },
}

impl Repeat {
    /// Build a repeat setting from a mode name and an optional custom rule
    ///
    /// The rule is only used when the mode is `custom`; a custom mode without a
    /// rule repeats daily.
    pub fn from_mode(mode: &str, rule: Option<&str>) -> Result<Self, String> {
        match mode.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Repeat::None),
            "daily" => Ok(Repeat::Daily),
            "weekdays" => Ok(Repeat::Weekdays),
            "weekly" => Ok(Repeat::Weekly),
            "monthly" => Ok(Repeat::Monthly),
            "custom" => Ok(Repeat::Custom {
                rrule: RecurrenceRule::parse(rule.unwrap_or_default()),
            }),
            other => Err(format!(
                "Invalid repeat mode '{}'. Valid options are: none, daily, weekdays, weekly, monthly, custom",
                other
            )),
        }
    }

    /// Mode name as used in tool arguments and storage
    pub fn mode(&self) -> &'static str {
        match self {
            Repeat::None => "none",
            Repeat::Daily => "daily",
            Repeat::Weekdays => "weekdays",
            Repeat::Weekly => "weekly",
            Repeat::Monthly => "monthly",
            Repeat::Custom { .. } => "custom",
        }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repeat::Custom { rrule } => write!(f, "custom ({})", rrule),
            other => f.write_str(other.mode()),
        }
    }
}

/// Compute the next occurrence after `due`
///
/// Returns `None` when there is no due timestamp to recur from, when the task
/// does not repeat, or when the result falls outside the representable range.
pub fn next_occurrence(due: Option<NaiveDateTime>, repeat: &Repeat) -> Option<NaiveDateTime> {
    let due = due?;
    match repeat {
        Repeat::None => None,
        Repeat::Daily => add_days(due, 1),
        Repeat::Weekdays => {
            let mut next = add_days(due, 1)?;
            while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
                next = add_days(next, 1)?;
            }
            Some(next)
        }
        Repeat::Weekly => add_days(due, 7),
        Repeat::Monthly => add_months_rollover(due, 1),
        Repeat::Custom { rrule } => rrule.advance(due),
    }
}

fn add_days(from: NaiveDateTime, days: u64) -> Option<NaiveDateTime> {
    from.checked_add_days(Days::new(days))
}

/// Add calendar months keeping the day-of-month offset
///
/// A day that does not exist in the target month spills over into the next
/// one (January 31 plus one month is March 3 in a non-leap year).
fn add_months_rollover(from: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    let total = i64::from(from.year()) * 12 + i64::from(from.month0()) + i64::from(months);
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let date = first.checked_add_days(Days::new(u64::from(from.day() - 1)))?;
    Some(date.and_time(from.time()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn custom(rule: &str) -> Repeat {
        Repeat::Custom {
            rrule: RecurrenceRule::parse(rule),
        }
    }

    #[test]
    fn test_no_due_date_has_no_occurrence() {
        assert_eq!(next_occurrence(None, &Repeat::Daily), None);
        assert_eq!(next_occurrence(None, &custom("FREQ=WEEKLY")), None);
    }

    #[test]
    fn test_none_mode_has_no_occurrence() {
        assert_eq!(next_occurrence(Some(at(2026, 10, 19)), &Repeat::None), None);
    }

    #[test]
    fn test_daily_rolls_over_month_and_year() {
        assert_eq!(
            next_occurrence(Some(at(2026, 10, 19)), &Repeat::Daily),
            Some(at(2026, 10, 20))
        );
        assert_eq!(
            next_occurrence(Some(at(2026, 2, 28)), &Repeat::Daily),
            Some(at(2026, 3, 1))
        );
        assert_eq!(
            next_occurrence(Some(at(2026, 12, 31)), &Repeat::Daily),
            Some(at(2027, 1, 1))
        );
    }

    #[test]
    fn test_daily_keeps_time_of_day() {
        let due = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(23, 45, 10)
            .unwrap();
        let next = next_occurrence(Some(due), &Repeat::Daily).unwrap();
        assert_eq!(next.time(), due.time());
    }

    #[test]
    fn test_weekdays_skips_weekend() {
        // 2026-10-23 is a Friday
        assert_eq!(
            next_occurrence(Some(at(2026, 10, 23)), &Repeat::Weekdays),
            Some(at(2026, 10, 26))
        );
        // Saturday and Sunday both land on Monday
        assert_eq!(
            next_occurrence(Some(at(2026, 10, 24)), &Repeat::Weekdays),
            Some(at(2026, 10, 26))
        );
        assert_eq!(
            next_occurrence(Some(at(2026, 10, 25)), &Repeat::Weekdays),
            Some(at(2026, 10, 26))
        );
    }

    #[test]
    fn test_weekdays_is_earliest_weekday_after_due() {
        let start = at(2026, 10, 1);
        for offset in 0..14 {
            let due = start + chrono::Duration::days(offset);
            let next = next_occurrence(Some(due), &Repeat::Weekdays).unwrap();
            assert!(!matches!(next.weekday(), Weekday::Sat | Weekday::Sun));
            assert!(next > due);
            let mut day = due + chrono::Duration::days(1);
            while day < next {
                assert!(matches!(day.weekday(), Weekday::Sat | Weekday::Sun));
                day += chrono::Duration::days(1);
            }
        }
    }

    #[test]
    fn test_weekly_adds_seven_days() {
        assert_eq!(
            next_occurrence(Some(at(2026, 12, 28)), &Repeat::Weekly),
            Some(at(2027, 1, 4))
        );
    }

    #[test]
    fn test_monthly_same_day_next_month() {
        assert_eq!(
            next_occurrence(Some(at(2026, 10, 19)), &Repeat::Monthly),
            Some(at(2026, 11, 19))
        );
        assert_eq!(
            next_occurrence(Some(at(2026, 12, 5)), &Repeat::Monthly),
            Some(at(2027, 1, 5))
        );
    }

    #[test]
    fn test_monthly_short_month_overflows() {
        assert_eq!(
            next_occurrence(Some(at(2026, 1, 31)), &Repeat::Monthly),
            Some(at(2026, 3, 3))
        );
        assert_eq!(
            next_occurrence(Some(at(2028, 1, 31)), &Repeat::Monthly),
            Some(at(2028, 3, 2))
        );
        assert_eq!(
            next_occurrence(Some(at(2026, 3, 31)), &Repeat::Monthly),
            Some(at(2026, 5, 1))
        );
    }

    #[test]
    fn test_parse_full_rule() {
        let rule = RecurrenceRule::parse("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE");
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.interval, 2);
        assert_eq!(rule.by_day, Some(vec![Weekday::Mon, Weekday::Wed]));
        assert_eq!(rule.to_string(), "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE");
    }

    #[test]
    fn test_parse_defaults() {
        let rule = RecurrenceRule::parse("");
        assert_eq!(rule.frequency, Frequency::Daily);
        assert_eq!(rule.interval, 1);
        assert_eq!(rule.by_day, None);
    }

    #[test]
    fn test_parse_unknown_freq_defaults_to_daily() {
        let rule = RecurrenceRule::parse("FREQ=YEARLY");
        assert_eq!(rule.frequency, Frequency::Daily);
        assert_eq!(
            next_occurrence(Some(at(2026, 10, 19)), &custom("FREQ=YEARLY")),
            Some(at(2026, 10, 20))
        );
    }

    #[test]
    fn test_parse_bad_interval_defaults_to_one() {
        assert_eq!(RecurrenceRule::parse("INTERVAL=abc").interval, 1);
        assert_eq!(RecurrenceRule::parse("INTERVAL=0").interval, 1);
        assert_eq!(RecurrenceRule::parse("INTERVAL=-3").interval, 1);
        assert_eq!(RecurrenceRule::parse("INTERVAL=4").interval, 4);
    }

    #[test]
    fn test_parse_ignores_unknown_keys_and_codes() {
        let rule = RecurrenceRule::parse("FREQ=DAILY;COUNT=3;BYDAY=XX,FR;junk");
        assert_eq!(rule.by_day, Some(vec![Weekday::Fri]));
    }

    #[test]
    fn test_custom_weekly_interval_two_steps_fourteen_days() {
        assert_eq!(
            next_occurrence(Some(at(2026, 10, 19)), &custom("FREQ=WEEKLY;INTERVAL=2")),
            Some(at(2026, 11, 2))
        );
    }

    #[test]
    fn test_custom_monthly_interval() {
        assert_eq!(
            next_occurrence(Some(at(2026, 10, 19)), &custom("FREQ=MONTHLY;INTERVAL=3")),
            Some(at(2027, 1, 19))
        );
    }

    #[test]
    fn test_custom_byday_moves_to_next_allowed_day() {
        // 2026-10-19 is a Monday; +1 day is Tuesday, next allowed is Wednesday
        assert_eq!(
            next_occurrence(Some(at(2026, 10, 19)), &custom("FREQ=DAILY;BYDAY=MO,WE")),
            Some(at(2026, 10, 21))
        );
    }

    #[test]
    fn test_custom_byday_keeps_base_step_when_allowed() {
        // Weekly from Monday lands on Monday, which is allowed
        assert_eq!(
            next_occurrence(Some(at(2026, 10, 19)), &custom("FREQ=WEEKLY;BYDAY=MO,WE")),
            Some(at(2026, 10, 26))
        );
    }

    #[test]
    fn test_custom_byday_unrecognized_codes_stop_at_bound() {
        let next = next_occurrence(Some(at(2026, 10, 19)), &custom("BYDAY=XX,YY")).unwrap();
        assert_eq!(next, at(2026, 10, 20) + chrono::Duration::days(14));
    }

    #[test]
    fn test_custom_empty_byday_is_ignored() {
        assert_eq!(
            next_occurrence(Some(at(2026, 10, 19)), &custom("FREQ=DAILY;BYDAY=")),
            Some(at(2026, 10, 20))
        );
    }

    #[test]
    fn test_repeat_from_mode() {
        assert_eq!(Repeat::from_mode("weekly", None).unwrap(), Repeat::Weekly);
        assert_eq!(
            Repeat::from_mode("none", Some("FREQ=WEEKLY")).unwrap(),
            Repeat::None
        );
        let repeat = Repeat::from_mode("custom", Some("FREQ=WEEKLY;INTERVAL=2")).unwrap();
        assert_eq!(repeat.mode(), "custom");
        assert_eq!(repeat.to_string(), "custom (FREQ=WEEKLY;INTERVAL=2)");
        assert!(Repeat::from_mode("hourly", None).is_err());
    }
}
