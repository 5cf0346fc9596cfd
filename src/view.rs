use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::date::parse_event_date;
use crate::recurrence::milestone::{
    dday_window, generate_milestones, monthly_occurrences, yearly_occurrences, Milestone,
    MonthlyOccurrence, WindowDay, YearlyOccurrence,
};
use crate::recurrence::{compute_display, evaluate, DayCount, DisplayResult, LeapDayPolicy};
use crate::types::{Category, Event};

/// One line of the event list
#[derive(Debug, Serialize)]
pub struct ListRow {
    #[serde(flatten)]
    pub event: Event,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<DayCount>,
}

/// Category-specific breakdown shown under the detail headline
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "entries", rename_all = "snake_case")]
pub enum Listing {
    Milestones(Vec<Milestone>),
    DDayWindow(Vec<WindowDay>),
    Yearly(Vec<YearlyOccurrence>),
    Monthly(Vec<MonthlyOccurrence>),
    Empty,
}

#[derive(Debug, Serialize)]
pub struct DetailView {
    pub event: Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<DayCount>,
    /// Image path, only when the file is still there
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub listing: Listing,
}

pub fn list_rows(events: Vec<Event>, today: NaiveDate, policy: LeapDayPolicy) -> Vec<ListRow> {
    events
        .into_iter()
        .map(|event| match compute_display(&event.category, &event.date, today, policy) {
            DisplayResult::Computed(count) => ListRow {
                label: count.label(),
                count: Some(count),
                event,
            },
            DisplayResult::Passthrough(raw) => ListRow {
                label: raw,
                count: None,
                event,
            },
        })
        .collect()
}

pub fn detail_view(event: Event, today: NaiveDate, config: &Config) -> DetailView {
    let image = existing_image(&event);

    let Ok(reference) = parse_event_date(&event.date) else {
        return DetailView {
            event,
            count: None,
            image,
            listing: Listing::Empty,
        };
    };

    let count = evaluate(&event.category, reference, today, config.leap_day);
    let listing = match event.category {
        Category::Anniversary => Listing::Milestones(generate_milestones(
            reference,
            today,
            config.milestone_interval,
            config.milestone_count,
        )),
        Category::DDay => Listing::DDayWindow(dday_window(reference, today, config.dday_window)),
        Category::Yearly => Listing::Yearly(yearly_occurrences(
            reference,
            today,
            config.yearly_count,
            config.yearly_past,
            config.leap_day,
        )),
        Category::Monthly => Listing::Monthly(monthly_occurrences(
            reference,
            today,
            config.monthly_count,
            config.monthly_past,
        )),
        Category::Unknown(_) => Listing::Empty,
    };

    DetailView {
        event,
        count,
        image,
        listing,
    }
}

fn existing_image(event: &Event) -> Option<String> {
    let path = event.image.as_deref()?;
    if Path::new(path).exists() {
        Some(path.to_string())
    } else {
        tracing::warn!(id = event.id, path, "image file missing, showing event without it");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn event(date: &str, category: Category) -> Event {
        Event {
            id: 7,
            title: "Trip".to_string(),
            date: date.to_string(),
            image: None,
            category,
            show_notification: false,
            notify_100_days: true,
            notify_yearly: true,
            order: 0,
        }
    }

    #[test]
    fn test_list_rows_labels() {
        let events = vec![
            event("2024/6/20", Category::DDay),
            event("2024/6/1", Category::Anniversary),
            event("not a date", Category::DDay),
            event("2024/6/1", Category::Unknown("weekly".into())),
        ];
        let rows = list_rows(events, d(2024, 6, 10), LeapDayPolicy::default());
        assert_eq!(rows[0].label, "D-10");
        assert_eq!(rows[1].label, "D+10");
        assert_eq!(rows[2].label, "not a date");
        assert!(rows[2].count.is_none());
        assert_eq!(rows[3].label, "2024/6/1");
    }

    #[test]
    fn test_detail_listing_per_category() {
        let config = Config::default();
        let today = d(2024, 6, 10);

        let v = detail_view(event("2024/6/1", Category::Anniversary), today, &config);
        assert!(matches!(v.listing, Listing::Milestones(ref m) if m.len() == 10));

        let v = detail_view(event("2024/6/20", Category::DDay), today, &config);
        assert!(matches!(v.listing, Listing::DDayWindow(ref w) if w.len() == 15));

        let v = detail_view(event("2020/6/1", Category::Yearly), today, &config);
        assert!(matches!(v.listing, Listing::Yearly(ref y) if y.len() == 11));

        let v = detail_view(event("2020/6/1", Category::Monthly), today, &config);
        assert!(matches!(v.listing, Listing::Monthly(ref m) if m.len() == 12));

        let v = detail_view(event("2020/6/1", Category::Unknown(String::new())), today, &config);
        assert!(matches!(v.listing, Listing::Empty));
        assert!(v.count.is_none());
    }

    #[test]
    fn test_detail_missing_image_is_dropped() {
        let mut e = event("2024/6/1", Category::DDay);
        e.image = Some("/definitely/not/here.png".to_string());
        let v = detail_view(e, d(2024, 6, 10), &Config::default());
        assert!(v.image.is_none());
    }

    #[test]
    fn test_detail_existing_image_is_kept() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().display().to_string();
        let mut e = event("2024/6/1", Category::DDay);
        e.image = Some(path.clone());
        let v = detail_view(e, d(2024, 6, 10), &Config::default());
        assert_eq!(v.image, Some(path));
    }
}
