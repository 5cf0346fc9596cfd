//! Notification dispatch and the once-a-day reminder job.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Language;
use crate::error::AppResult;
use crate::recurrence::trigger::should_fire_reminder;
use crate::recurrence::{compute_display, DisplayResult, LeapDayPolicy};
use crate::render::{day_count_text, reminder_text};
use crate::types::Event;

/// Persistent notifications use ids offset from the event id so they never
/// collide with one-time reminders, which use the event id itself
pub const PERSISTENT_ID_BASE: i64 = 1000;

/// Where notifications are shown
pub trait Notifier {
    /// Show or refresh the ongoing notification for an event
    fn show_persistent(&mut self, event: &Event, text: &str) -> AppResult<()>;

    /// Show a one-time reminder
    fn show_reminder(&mut self, event: &Event, message: &str) -> AppResult<()>;

    /// Remove the ongoing notification for an event
    fn cancel(&mut self, event_id: i64) -> AppResult<()>;
}

/// Writes notifications as lines to a stream
pub struct ConsoleNotifier<W: Write> {
    out: W,
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn show_persistent(&mut self, event: &Event, text: &str) -> AppResult<()> {
        writeln!(self.out, "[{}] {}: {}", PERSISTENT_ID_BASE + event.id, event.title, text)?;
        Ok(())
    }

    fn show_reminder(&mut self, event: &Event, message: &str) -> AppResult<()> {
        writeln!(self.out, "[{}] {}: {}", event.id, event.title, message)?;
        Ok(())
    }

    fn cancel(&mut self, event_id: i64) -> AppResult<()> {
        writeln!(self.out, "[{}] cleared", PERSISTENT_ID_BASE + event_id)?;
        Ok(())
    }
}

/// Settings the daily job needs from the user config
#[derive(Debug, Clone, Copy)]
pub struct JobSettings {
    pub language: Language,
    pub leap_day: LeapDayPolicy,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct JobOutcome {
    /// False when the job had already run today
    pub ran: bool,
    pub persistent: usize,
    pub reminders: usize,
}

/// Refresh persistent notifications and fire reminders due `today`.
///
/// `last_run` is the day the job last completed; a second run on the same
/// day is skipped unless `force` is set. The caller records `today` as the
/// new last run when `ran` is true.
pub fn run_daily_job(
    events: &[Event],
    notifier: &mut dyn Notifier,
    last_run: Option<NaiveDate>,
    today: NaiveDate,
    settings: JobSettings,
    force: bool,
) -> JobOutcome {
    if !force && last_run == Some(today) {
        tracing::info!(%today, "notifications already refreshed today");
        return JobOutcome::default();
    }

    let mut outcome = JobOutcome {
        ran: true,
        ..JobOutcome::default()
    };

    for event in events {
        if event.show_notification {
            let text = match compute_display(&event.category, &event.date, today, settings.leap_day) {
                DisplayResult::Computed(count) => day_count_text(&count, settings.language),
                DisplayResult::Passthrough(raw) => raw,
            };
            match notifier.show_persistent(event, &text) {
                Ok(()) => outcome.persistent += 1,
                Err(e) => tracing::warn!(id = event.id, error = %e, "persistent notification failed"),
            }
        }

        for kind in should_fire_reminder(event, today) {
            let message = reminder_text(&event.title, kind, settings.language);
            match notifier.show_reminder(event, &message) {
                Ok(()) => {
                    tracing::info!(id = event.id, ?kind, "reminder sent");
                    outcome.reminders += 1;
                }
                Err(e) => tracing::warn!(id = event.id, error = %e, "reminder failed"),
            }
        }
    }

    outcome
}
