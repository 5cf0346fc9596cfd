use chrono::{Datelike, Duration, NaiveDate};

use crate::config::Language;
use crate::recurrence::milestone::YearLabel;
use crate::recurrence::trigger::ReminderKind;
use crate::recurrence::{DayCount, DayStatus};
use crate::types::Category;
use crate::view::{DetailView, ListRow, Listing};

/// Sentence describing a day count, as shown in notifications and the
/// detail headline
pub fn day_count_text(count: &DayCount, lang: Language) -> String {
    let today = count.occurrence + Duration::days(count.signed_days);
    let later_year = count.occurrence.year() > today.year();
    let later_month = count.occurrence.month() != today.month() || later_year;

    match (lang, &count.category, count.status()) {
        (Language::Zh, _, DayStatus::Today) => "就是今天！".to_string(),
        (Language::Zh, _, DayStatus::NotStarted) => "還沒開始".to_string(),
        (Language::Zh, Category::Anniversary, DayStatus::Elapsed(n)) => format!("已經 {n} 天"),
        (Language::Zh, Category::Yearly, DayStatus::Remaining(n)) if later_year => format!("明年還有 {n} 天"),
        (Language::Zh, Category::Yearly, DayStatus::Remaining(n)) => format!("今年還有 {n} 天"),
        (Language::Zh, Category::Monthly, DayStatus::Remaining(n)) if later_month => format!("下月還有 {n} 天"),
        (Language::Zh, Category::Monthly, DayStatus::Remaining(n)) => format!("本月還有 {n} 天"),
        (Language::Zh, _, DayStatus::Remaining(n)) => format!("還有 {n} 天"),
        (Language::Zh, _, DayStatus::Elapsed(n)) => format!("已過 {n} 天"),

        (Language::En, _, DayStatus::Today) => "Today!".to_string(),
        (Language::En, _, DayStatus::NotStarted) => "Not started yet".to_string(),
        (Language::En, Category::Anniversary, DayStatus::Elapsed(n)) => format!("Day {n}"),
        (Language::En, Category::Yearly, DayStatus::Remaining(n)) if later_year => format!("{n} days left, next year"),
        (Language::En, Category::Monthly, DayStatus::Remaining(n)) if later_month => format!("{n} days left, next month"),
        (Language::En, _, DayStatus::Remaining(n)) => format!("{n} days left"),
        (Language::En, _, DayStatus::Elapsed(n)) => format!("{n} days ago"),
    }
}

pub fn reminder_text(title: &str, kind: ReminderKind, lang: Language) -> String {
    match (lang, kind) {
        (Language::Zh, ReminderKind::Milestone100) => format!("今天是 {title} 的100天紀念日！"),
        (Language::Zh, ReminderKind::YearlyAnniversary { years }) => {
            format!("今天是 {title} 的 {years} 週年紀念日！")
        }
        (Language::En, ReminderKind::Milestone100) => format!("Today is day 100 of {title}!"),
        (Language::En, ReminderKind::YearlyAnniversary { years }) => {
            format!("Today is the {years}-year anniversary of {title}!")
        }
    }
}

fn format_date(date: NaiveDate, lang: Language) -> String {
    match lang {
        Language::Zh => format!("{}年{}月{}日", date.year(), date.month(), date.day()),
        Language::En => date.format("%Y-%m-%d").to_string(),
    }
}

/// Relative offset of a listing entry (`days_remaining` from today)
fn offset_text(days_remaining: i64, lang: Language) -> String {
    match (lang, days_remaining) {
        (Language::Zh, 0) => "就是今天！".to_string(),
        (Language::Zh, d) if d > 0 => format!("還有 {d} 天"),
        (Language::Zh, d) => format!("已過 {} 天", -d),
        (Language::En, 0) => "today".to_string(),
        (Language::En, d) if d > 0 => format!("in {d} days"),
        (Language::En, d) => format!("{} days ago", -d),
    }
}

/// Rows of the category listing as (label, date, offset) columns
fn listing_rows(listing: &Listing, lang: Language) -> Vec<(String, String, String)> {
    match listing {
        Listing::Milestones(ms) => ms
            .iter()
            .map(|m| {
                let label = match lang {
                    Language::Zh => format!("{} 天紀念日", m.days),
                    Language::En => format!("Day {}", m.days),
                };
                (label, format_date(m.date, lang), offset_text(m.days_remaining, lang))
            })
            .collect(),
        Listing::DDayWindow(days) => days
            .iter()
            .map(|w| (w.label.clone(), format_date(w.date, lang), offset_text(w.days_remaining, lang)))
            .collect(),
        Listing::Yearly(ys) => ys
            .iter()
            .map(|y| {
                let label = match (lang, y.label) {
                    (Language::Zh, YearLabel::Start) => "起始日".to_string(),
                    (Language::Zh, YearLabel::Year(k)) => format!("第 {k} 年"),
                    (Language::En, YearLabel::Start) => "Start".to_string(),
                    (Language::En, YearLabel::Year(k)) => format!("Year {k}"),
                };
                (label, format_date(y.date, lang), offset_text(y.days_remaining, lang))
            })
            .collect(),
        Listing::Monthly(ms) => ms
            .iter()
            .map(|m| {
                let label = match lang {
                    Language::Zh => format!("{}月", m.date.month()),
                    Language::En => m.date.format("%b").to_string(),
                };
                (label, format_date(m.date, lang), offset_text(m.days_remaining, lang))
            })
            .collect(),
        Listing::Empty => Vec::new(),
    }
}

fn listing_title(listing: &Listing, lang: Language) -> &'static str {
    match (lang, listing) {
        (Language::Zh, Listing::Milestones(_)) => "紀念日計算",
        (Language::Zh, Listing::DDayWindow(_)) => "D-DAY 計算",
        (Language::Zh, Listing::Yearly(_)) => "每年紀念日",
        (Language::Zh, Listing::Monthly(_)) => "每月紀念日",
        (Language::En, Listing::Milestones(_)) => "Milestones",
        (Language::En, Listing::DDayWindow(_)) => "Around the day",
        (Language::En, Listing::Yearly(_)) => "Every year",
        (Language::En, Listing::Monthly(_)) => "Every month",
        (_, Listing::Empty) => "",
    }
}

/// Render the event list as plain text, one event per line
pub fn render_list_text(rows: &[ListRow]) -> String {
    let mut output = String::new();
    for row in rows {
        output.push_str(&format!(
            "{:>4}  {:<10}  {}  ({})\n",
            row.event.id, row.label, row.event.title, row.event.date
        ));
    }
    output
}

/// Render the event list as Markdown
pub fn render_list_markdown(rows: &[ListRow]) -> String {
    let mut output = String::from("# Events\n\n");
    if rows.is_empty() {
        return output;
    }
    output.push_str("| ID | Count | Title | Date | Category |\n");
    output.push_str("|---|---|---|---|---|\n");
    for row in rows {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            row.event.id,
            row.label,
            table_escape(&row.event.title),
            table_escape(&row.event.date),
            row.event.category.tag()
        ));
    }
    output
}

/// Keep a value inside one Markdown table cell
fn table_escape(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn headline(view: &DetailView, lang: Language) -> String {
    match view.count {
        Some(ref count) => format!("{}  {}", count.label(), day_count_text(count, lang)),
        None => view.event.date.clone(),
    }
}

/// Render one event's detail view as plain text
pub fn render_detail_text(view: &DetailView, lang: Language) -> String {
    let mut output = format!("{}\n{}\n", view.event.title, headline(view, lang));
    output.push_str(&format!("{} · {}\n", view.event.date, view.event.category.tag()));
    if let Some(ref image) = view.image {
        output.push_str(&format!("Image: {image}\n"));
    }

    let rows = listing_rows(&view.listing, lang);
    if !rows.is_empty() {
        output.push_str(&format!("\n{}\n", listing_title(&view.listing, lang)));
        for (label, date, offset) in rows {
            output.push_str(&format!("  {label:<12} {date:<14} {offset}\n"));
        }
    }
    output
}

/// Render one event's detail view as Markdown
pub fn render_detail_markdown(view: &DetailView, lang: Language) -> String {
    let mut output = format!("# {}\n\n", view.event.title);
    output.push_str(&format!("**{}**\n\n", headline(view, lang)));
    output.push_str(&format!("**Date:** {}\n", view.event.date));
    output.push_str(&format!("**Category:** {}\n", view.event.category.tag()));
    if let Some(ref image) = view.image {
        output.push_str(&format!("\n![{}]({})\n", view.event.title, image));
    }

    let rows = listing_rows(&view.listing, lang);
    if !rows.is_empty() {
        output.push_str(&format!("\n## {}\n\n", listing_title(&view.listing, lang)));
        for (label, date, offset) in rows {
            output.push_str(&format!("- {label} · {date} · {offset}\n"));
        }
    }
    output
}
