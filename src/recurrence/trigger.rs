use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::date::{days_between, parse_event_date};
use crate::types::Event;

/// Day number that triggers the one-time milestone reminder
pub const MILESTONE_REMINDER_DAYS: i64 = 100;

/// One-time reminder due today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReminderKind {
    Milestone100,
    YearlyAnniversary { years: i32 },
}

/// Reminders due for `event` on `today`.
///
/// Matches are exact: a day the job did not run is never caught up.
pub fn should_fire_reminder(event: &Event, today: NaiveDate) -> Vec<ReminderKind> {
    let reference = match parse_event_date(&event.date) {
        Ok(d) => d,
        Err(e) => {
            tracing::debug!(id = event.id, error = %e, "no reminders for unparseable date");
            return Vec::new();
        }
    };

    let mut kinds = Vec::new();

    if event.notify_100_days && days_between(reference, today) == MILESTONE_REMINDER_DAYS {
        kinds.push(ReminderKind::Milestone100);
    }

    if event.notify_yearly
        && today.month() == reference.month()
        && today.day() == reference.day()
        && today.year() > reference.year()
    {
        kinds.push(ReminderKind::YearlyAnniversary {
            years: today.year() - reference.year(),
        });
    }

    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::format_event_date;
    use crate::types::Category;
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn event_on(date: NaiveDate) -> Event {
        Event {
            id: 1,
            title: "Together".to_string(),
            date: format_event_date(date),
            image: None,
            category: Category::Anniversary,
            show_notification: false,
            notify_100_days: true,
            notify_yearly: true,
            order: 0,
        }
    }

    #[test]
    fn test_milestone_exact_day() {
        let today = d(2024, 8, 15);
        let event = event_on(today - Duration::days(100));
        assert_eq!(should_fire_reminder(&event, today), vec![ReminderKind::Milestone100]);
    }

    #[test]
    fn test_milestone_neighbouring_days() {
        let today = d(2024, 8, 15);
        for offset in [99, 101] {
            let event = event_on(today - Duration::days(offset));
            assert!(should_fire_reminder(&event, today).is_empty(), "offset {offset}");
        }
    }

    #[test]
    fn test_milestone_disabled() {
        let today = d(2024, 8, 15);
        let mut event = event_on(today - Duration::days(100));
        event.notify_100_days = false;
        assert!(should_fire_reminder(&event, today).is_empty());
    }

    #[test]
    fn test_yearly_anniversary() {
        let event = event_on(d(2020, 8, 15));
        assert_eq!(
            should_fire_reminder(&event, d(2024, 8, 15)),
            vec![ReminderKind::YearlyAnniversary { years: 4 }]
        );
    }

    #[test]
    fn test_yearly_not_on_start_day() {
        let event = event_on(d(2024, 8, 15));
        assert!(should_fire_reminder(&event, d(2024, 8, 15)).is_empty());
    }

    #[test]
    fn test_yearly_disabled() {
        let mut event = event_on(d(2020, 8, 15));
        event.notify_yearly = false;
        assert!(should_fire_reminder(&event, d(2024, 8, 15)).is_empty());
    }

    #[test]
    fn test_leap_day_only_fires_on_feb_29() {
        let event = event_on(d(2020, 2, 29));
        assert!(should_fire_reminder(&event, d(2021, 2, 28)).is_empty());
        assert!(should_fire_reminder(&event, d(2021, 3, 1)).is_empty());
        assert_eq!(
            should_fire_reminder(&event, d(2024, 2, 29)),
            vec![ReminderKind::YearlyAnniversary { years: 4 }]
        );
    }

    #[test]
    fn test_unparseable_date() {
        let mut event = event_on(d(2020, 1, 1));
        event.date = "someday".to_string();
        assert!(should_fire_reminder(&event, d(2024, 1, 1)).is_empty());
    }
}
