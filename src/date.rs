use chrono::{Datelike, Local, NaiveDate, TimeZone};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::error::{AppError, AppResult};

/// Event date pattern: 2023/4/1 (month and day may be unpadded)
static EVENT_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})/([0-9]{1,2})/([0-9]{1,2})$").expect("Invalid EVENT_DATE_RE regex")
});

/// Why a stored date string could not be read
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DateParseError {
    #[error("'{0}' does not match YYYY/M/D")]
    Pattern(String),

    #[error("'{0}' is not a calendar date")]
    OutOfRange(String),
}

/// Parse an event date in `YYYY/M/D` form
pub fn parse_event_date(s: &str) -> Result<NaiveDate, DateParseError> {
    let s = s.trim();
    let caps = EVENT_DATE_RE
        .captures(s)
        .ok_or_else(|| DateParseError::Pattern(s.to_string()))?;

    // The regex bounds the digit counts, so these parses cannot overflow
    let year: i32 = caps[1].parse().map_err(|_| DateParseError::Pattern(s.to_string()))?;
    let month: u32 = caps[2].parse().map_err(|_| DateParseError::Pattern(s.to_string()))?;
    let day: u32 = caps[3].parse().map_err(|_| DateParseError::Pattern(s.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateParseError::OutOfRange(s.to_string()))
}

/// Format a date the way events store it (`2023/4/1`)
pub fn format_event_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.year(), date.month(), date.day())
}

/// Current calendar date, in `tz` when given, otherwise the local zone
pub fn today(tz: Option<&str>) -> AppResult<NaiveDate> {
    match tz {
        Some(name) => {
            let tz: Tz = name
                .parse()
                .map_err(|e| AppError::Config(format!("Unknown timezone '{name}': {e}")))?;
            Ok(tz.from_utc_datetime(&chrono::Utc::now().naive_utc()).date_naive())
        }
        None => Ok(Local::now().date_naive()),
    }
}

/// Whole calendar days from `from` to `to` (positive when `to` is later)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Build a date with `day` clamped to the length of the month
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}

/// Shift a date by whole months, clamping the day to the target month
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date.year() as i64 * 12 + date.month0() as i64 + months as i64;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = index.rem_euclid(12) as u32 + 1;

    clamped_date(year, month, date.day())
}
