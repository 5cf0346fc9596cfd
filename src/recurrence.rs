//! Day-count evaluation for every event category.
//!
//! All presentation paths (list labels, the detail view, notification
//! texts) go through [`evaluate`] and only differ in how they format the
//! resulting [`DayCount`].

pub mod milestone;
pub mod trigger;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date::{clamped_date, days_between, is_leap_year, parse_event_date};
use crate::types::Category;

/// Where a Feb 29 reference date lands in a non-leap year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapDayPolicy {
    /// Feb 28 of the target year
    #[default]
    ClampToFeb28,
    /// Mar 1 of the target year
    ShiftToMar1,
}

/// Day count computed for one event on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub category: Category,
    /// `today - occurrence` in days. For anniversaries this is the
    /// inclusive count of days since the start date (start day = 1).
    pub signed_days: i64,
    pub occurrence: NaiveDate,
    pub is_today: bool,
}

/// Human-level reading of a [`DayCount`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Today,
    Remaining(i64),
    Elapsed(i64),
    /// Anniversary whose start date is still ahead
    NotStarted,
}

/// Evaluation result for a stored event
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayResult {
    Computed(DayCount),
    /// The stored date string, shown as-is
    Passthrough(String),
}

impl DayCount {
    pub fn status(&self) -> DayStatus {
        match self.category {
            Category::Anniversary if self.signed_days <= 0 => DayStatus::NotStarted,
            Category::Anniversary => DayStatus::Elapsed(self.signed_days),
            _ => match self.signed_days {
                0 => DayStatus::Today,
                d if d < 0 => DayStatus::Remaining(-d),
                d => DayStatus::Elapsed(d),
            },
        }
    }

    /// Short card label: `D-Day`, `D-3`, `D+12`
    pub fn label(&self) -> String {
        match self.category {
            // Day 1 is the start date itself, so "not started" is one day
            // further from the start than the raw count suggests
            Category::Anniversary if self.signed_days <= 0 => dday_label(self.signed_days - 1),
            Category::Anniversary => format!("D+{}", self.signed_days),
            _ => dday_label(self.signed_days),
        }
    }
}

/// Label for a date `days_since` days in the past (negative: in the future)
pub fn dday_label(days_since: i64) -> String {
    match days_since {
        0 => "D-Day".to_string(),
        d if d < 0 => format!("D-{}", -d),
        d => format!("D+{d}"),
    }
}

/// Move `reference` into `year`, applying `policy` to Feb 29
pub fn with_year(reference: NaiveDate, year: i32, policy: LeapDayPolicy) -> Option<NaiveDate> {
    if reference.month() == 2 && reference.day() == 29 && !is_leap_year(year) {
        return match policy {
            LeapDayPolicy::ClampToFeb28 => NaiveDate::from_ymd_opt(year, 2, 28),
            LeapDayPolicy::ShiftToMar1 => NaiveDate::from_ymd_opt(year, 3, 1),
        };
    }
    NaiveDate::from_ymd_opt(year, reference.month(), reference.day())
}

/// Next yearly occurrence on or after `today`
pub fn next_yearly(reference: NaiveDate, today: NaiveDate, policy: LeapDayPolicy) -> Option<NaiveDate> {
    let this_year = with_year(reference, today.year(), policy)?;
    if this_year < today {
        with_year(reference, today.year() + 1, policy)
    } else {
        Some(this_year)
    }
}

/// Next monthly occurrence strictly after `today`.
///
/// The following month is clamped from the reference day, not from this
/// month's clamped date, so a 31st goes from Feb 28 to Mar 31 rather than
/// Mar 28.
pub fn next_monthly(reference: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_month = clamped_date(today.year(), today.month(), reference.day())?;
    if this_month > today {
        return Some(this_month);
    }
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    clamped_date(year, month, reference.day())
}

/// Evaluate a parsed reference date. Returns `None` for unknown categories.
pub fn evaluate(
    category: &Category,
    reference: NaiveDate,
    today: NaiveDate,
    policy: LeapDayPolicy,
) -> Option<DayCount> {
    let (occurrence, signed_days) = match category {
        Category::DDay => (reference, days_between(reference, today)),
        Category::Anniversary => (reference, days_between(reference, today) + 1),
        Category::Yearly => {
            let next = next_yearly(reference, today, policy)?;
            (next, days_between(next, today))
        }
        Category::Monthly => {
            let next = next_monthly(reference, today)?;
            (next, days_between(next, today))
        }
        Category::Unknown(_) => return None,
    };

    Some(DayCount {
        category: category.clone(),
        signed_days,
        occurrence,
        is_today: occurrence == today,
    })
}

/// Evaluate a stored event date, falling back to the raw string
pub fn compute_display(
    category: &Category,
    date: &str,
    today: NaiveDate,
    policy: LeapDayPolicy,
) -> DisplayResult {
    let reference = match parse_event_date(date) {
        Ok(d) => d,
        Err(e) => {
            tracing::debug!(date, error = %e, "showing unparseable date as-is");
            return DisplayResult::Passthrough(date.to_string());
        }
    };

    match evaluate(category, reference, today, policy) {
        Some(count) => DisplayResult::Computed(count),
        None => DisplayResult::Passthrough(date.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn computed(category: Category, date: &str, today: NaiveDate) -> DayCount {
        match compute_display(&category, date, today, LeapDayPolicy::default()) {
            DisplayResult::Computed(c) => c,
            other => panic!("expected computed result, got {other:?}"),
        }
    }

    #[test]
    fn test_dday_today() {
        let c = computed(Category::DDay, "2024/5/20", d(2024, 5, 20));
        assert!(c.is_today);
        assert_eq!(c.status(), DayStatus::Today);
        assert_eq!(c.label(), "D-Day");
    }

    #[test]
    fn test_dday_remaining() {
        let c = computed(Category::DDay, "2024/5/20", d(2024, 5, 10));
        assert_eq!(c.signed_days, -10);
        assert_eq!(c.status(), DayStatus::Remaining(10));
        assert_eq!(c.label(), "D-10");
        assert!(!c.is_today);
    }

    #[test]
    fn test_dday_elapsed() {
        let c = computed(Category::DDay, "2024/5/20", d(2024, 6, 1));
        assert_eq!(c.signed_days, 12);
        assert_eq!(c.status(), DayStatus::Elapsed(12));
        assert_eq!(c.label(), "D+12");
    }

    #[test]
    fn test_anniversary_counts_start_day() {
        let c = computed(Category::Anniversary, "2023/04/01", d(2023, 4, 1));
        assert_eq!(c.signed_days, 1);
        assert_eq!(c.status(), DayStatus::Elapsed(1));
        assert_eq!(c.label(), "D+1");
    }

    #[test]
    fn test_anniversary_inclusive_after_start() {
        let c = computed(Category::Anniversary, "2023/1/1", d(2023, 4, 10));
        assert_eq!(c.signed_days, 100);
    }

    #[test]
    fn test_anniversary_not_started() {
        let c = computed(Category::Anniversary, "2023/4/10", d(2023, 4, 1));
        assert_eq!(c.signed_days, -8);
        assert_eq!(c.status(), DayStatus::NotStarted);
        assert_eq!(c.label(), "D-9");

        let eve = computed(Category::Anniversary, "2023/4/2", d(2023, 4, 1));
        assert_eq!(eve.signed_days, 0);
        assert_eq!(eve.status(), DayStatus::NotStarted);
    }

    #[test]
    fn test_yearly_later_this_year() {
        let c = computed(Category::Yearly, "2015/12/25", d(2024, 12, 1));
        assert_eq!(c.occurrence, d(2024, 12, 25));
        assert_eq!(c.status(), DayStatus::Remaining(24));
    }

    #[test]
    fn test_yearly_rolls_to_next_year() {
        let c = computed(Category::Yearly, "2015/3/1", d(2024, 12, 1));
        assert_eq!(c.occurrence, d(2025, 3, 1));
        assert_eq!(c.signed_days, -90);
    }

    #[test]
    fn test_yearly_today() {
        let c = computed(Category::Yearly, "2015/12/1", d(2024, 12, 1));
        assert!(c.is_today);
        assert_eq!(c.status(), DayStatus::Today);
    }

    #[test]
    fn test_yearly_leap_day_clamp() {
        let c = computed(Category::Yearly, "2020/02/29", d(2021, 3, 1));
        assert_eq!(c.occurrence, d(2022, 2, 28));
        assert_eq!(c.status(), DayStatus::Remaining(364));
    }

    #[test]
    fn test_yearly_leap_day_shift() {
        let c = match compute_display(&Category::Yearly, "2020/2/29", d(2021, 3, 1), LeapDayPolicy::ShiftToMar1) {
            DisplayResult::Computed(c) => c,
            other => panic!("expected computed result, got {other:?}"),
        };
        assert_eq!(c.occurrence, d(2021, 3, 1));
        assert!(c.is_today);
    }

    #[test]
    fn test_yearly_leap_day_in_leap_year() {
        let c = computed(Category::Yearly, "2020/2/29", d(2024, 2, 1));
        assert_eq!(c.occurrence, d(2024, 2, 29));
    }

    #[test]
    fn test_monthly_this_month() {
        let c = computed(Category::Monthly, "2023/1/15", d(2024, 6, 10));
        assert_eq!(c.occurrence, d(2024, 6, 15));
        assert_eq!(c.status(), DayStatus::Remaining(5));
    }

    #[test]
    fn test_monthly_same_day_rolls_forward() {
        let c = computed(Category::Monthly, "2023/1/15", d(2024, 6, 15));
        assert_eq!(c.occurrence, d(2024, 7, 15));
        assert!(!c.is_today);
    }

    #[test]
    fn test_monthly_clamps_day_31() {
        let c = computed(Category::Monthly, "2023/1/31", d(2024, 4, 2));
        assert_eq!(c.occurrence, d(2024, 4, 30));

        let feb = computed(Category::Monthly, "2023/1/31", d(2023, 2, 10));
        assert_eq!(feb.occurrence, d(2023, 2, 28));
    }

    #[test]
    fn test_monthly_reclamps_after_rollover() {
        let c = computed(Category::Monthly, "2023/1/31", d(2023, 2, 28));
        assert_eq!(c.occurrence, d(2023, 3, 31));
    }

    #[test]
    fn test_monthly_december_rollover() {
        let c = computed(Category::Monthly, "2023/1/5", d(2024, 12, 20));
        assert_eq!(c.occurrence, d(2025, 1, 5));
    }

    #[test]
    fn test_unknown_category_passthrough() {
        let r = compute_display(&Category::Unknown("weekly".into()), "2024/1/1", d(2024, 2, 1), LeapDayPolicy::default());
        assert_eq!(r, DisplayResult::Passthrough("2024/1/1".to_string()));
    }

    #[test]
    fn test_bad_date_passthrough() {
        let r = compute_display(&Category::DDay, "next friday", d(2024, 2, 1), LeapDayPolicy::default());
        assert_eq!(r, DisplayResult::Passthrough("next friday".to_string()));
    }

    #[test]
    fn test_dday_label() {
        assert_eq!(dday_label(0), "D-Day");
        assert_eq!(dday_label(-3), "D-3");
        assert_eq!(dday_label(7), "D+7");
    }
}
