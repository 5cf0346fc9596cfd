use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{dday_label, with_year, LeapDayPolicy};
use crate::date::{add_months, clamped_date, days_between};

/// Whether listings keep entries that are already in the past
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PastEntries {
    Keep,
    Drop,
}

/// N-th interval day counted from a start date (start day = day 1)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    /// Day number, e.g. 100, 200, ...
    pub days: i64,
    pub date: NaiveDate,
    pub days_remaining: i64,
}

/// Label of an entry in the yearly listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "year", rename_all = "lowercase")]
pub enum YearLabel {
    Start,
    Year(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyOccurrence {
    pub label: YearLabel,
    pub date: NaiveDate,
    pub days_remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyOccurrence {
    pub date: NaiveDate,
    pub days_remaining: i64,
}

/// One day around a D-Day target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowDay {
    pub label: String,
    pub date: NaiveDate,
    pub days_remaining: i64,
}

/// Iterate interval milestones that are today or later.
///
/// Milestone `k` lands on `reference + (interval * k - 1)` days so that the
/// start date itself counts as day 1. A zero interval yields nothing, and the
/// sequence ends at the last representable date.
pub fn milestones(
    reference: NaiveDate,
    today: NaiveDate,
    interval_days: u32,
    max_count: u32,
) -> impl Iterator<Item = Milestone> {
    let count = if interval_days == 0 { 0 } else { max_count as i64 };
    (1..=count)
        .map_while(move |k| {
            let days = (interval_days as i64).checked_mul(k)?;
            let date = reference.checked_add_signed(Duration::try_days(days - 1)?)?;
            Some(Milestone {
                days,
                date,
                days_remaining: days_between(today, date),
            })
        })
        .filter(|m| m.days_remaining >= 0)
}

pub fn generate_milestones(
    reference: NaiveDate,
    today: NaiveDate,
    interval_days: u32,
    max_count: u32,
) -> Vec<Milestone> {
    milestones(reference, today, interval_days, max_count).collect()
}

/// Anniversaries `reference + k years` for k in `0..=count`, ending early at
/// the last representable year
pub fn yearly_occurrences(
    reference: NaiveDate,
    today: NaiveDate,
    count: u32,
    past: PastEntries,
    policy: LeapDayPolicy,
) -> Vec<YearlyOccurrence> {
    let count = i32::try_from(count).unwrap_or(i32::MAX);
    (0..=count)
        .map_while(|k| {
            let date = with_year(reference, reference.year().checked_add(k)?, policy)?;
            Some(YearlyOccurrence {
                label: if k == 0 { YearLabel::Start } else { YearLabel::Year(k) },
                date,
                days_remaining: days_between(today, date),
            })
        })
        .filter(|o| past == PastEntries::Keep || o.days_remaining >= 0)
        .collect()
}

/// The reference day of month in today's month and the next `count` months,
/// ending early at the last representable month
pub fn monthly_occurrences(
    reference: NaiveDate,
    today: NaiveDate,
    count: u32,
    past: PastEntries,
) -> Vec<MonthlyOccurrence> {
    let Some(first_of_month) = NaiveDate::from_ymd_opt(today.year(), today.month(), 1) else {
        return Vec::new();
    };

    let count = i32::try_from(count).unwrap_or(i32::MAX);
    (0..=count)
        .map_while(|offset| {
            let month = add_months(first_of_month, offset)?;
            let date = clamped_date(month.year(), month.month(), reference.day())?;
            Some(MonthlyOccurrence {
                date,
                days_remaining: days_between(today, date),
            })
        })
        .filter(|o| past == PastEntries::Keep || o.days_remaining >= 0)
        .collect()
}

/// Days from `target - radius` to `target + radius`
pub fn dday_window(target: NaiveDate, today: NaiveDate, radius: u32) -> Vec<WindowDay> {
    let radius = radius as i64;
    (-radius..=radius)
        .filter_map(|offset| {
            let date = target.checked_add_signed(Duration::days(offset))?;
            let days_remaining = days_between(today, date);
            Some(WindowDay {
                label: dday_label(-days_remaining),
                date,
                days_remaining,
            })
        })
        .collect()
}
