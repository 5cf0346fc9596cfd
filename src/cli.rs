use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::date::{format_event_date, parse_event_date};
use crate::types::Category;

/// CLI arguments for countdays
#[derive(Parser)]
#[command(name = "countdays")]
#[command(about = "Track countdown and anniversary days with daily reminders")]
#[command(version)]
pub struct Cli {
    /// Config file (default: ~/.config/countdays/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Event database, overrides the config file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Output format: text, json, md
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json", "md"])]
    pub format: String,

    /// Timezone for "today" (IANA timezone, e.g., "Asia/Taipei")
    #[arg(long, global = true)]
    pub tz: Option<String>,

    /// Evaluate as if today were this date (YYYY-MM-DD format)
    #[arg(long, global = true, value_parser = validate_date)]
    pub today: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an event
    Add(AddArgs),
    /// Change fields of an event
    Edit(EditArgs),
    /// Delete an event permanently
    Delete {
        id: i64,
    },
    /// List events in display order
    List,
    /// Show the detail view of an event
    Show {
        id: i64,
    },
    /// Put the given events first, in this order
    Reorder {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
    /// Write a config file with default settings
    InitConfig,
    /// Refresh notifications and send today's reminders (run once a day)
    Notify {
        /// Run even if the job already ran today
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    /// Reference date (YYYY/M/D format)
    #[arg(long, value_parser = validate_event_date)]
    pub date: String,

    /// D-DAY, ANNIVERSARY, YEARLY or MONTHLY
    #[arg(long, default_value = "D-DAY", value_parser = parse_category)]
    pub category: Category,

    /// Path of a background image
    #[arg(long)]
    pub image: Option<String>,

    /// Keep an ongoing notification with the day count
    #[arg(long)]
    pub show_notification: bool,

    /// Do not remind on the 100th day
    #[arg(long)]
    pub no_100_days: bool,

    /// Do not remind on yearly anniversaries
    #[arg(long)]
    pub no_yearly: bool,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: i64,

    #[arg(long)]
    pub title: Option<String>,

    /// Reference date (YYYY/M/D format)
    #[arg(long, value_parser = validate_event_date)]
    pub date: Option<String>,

    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,

    #[arg(long, conflicts_with = "clear_image")]
    pub image: Option<String>,

    /// Remove the background image
    #[arg(long)]
    pub clear_image: bool,

    #[arg(long)]
    pub show_notification: Option<bool>,

    #[arg(long)]
    pub notify_100_days: Option<bool>,

    #[arg(long)]
    pub notify_yearly: Option<bool>,
}

/// Validate date format (YYYY-MM-DD)
fn validate_date(s: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|_| s.to_string())
        .map_err(|e| format!("Invalid date '{s}': {e}. Use YYYY-MM-DD format"))
}

/// Validate an event date (YYYY/M/D), dropping zero padding
fn validate_event_date(s: &str) -> Result<String, String> {
    parse_event_date(s)
        .map(format_event_date)
        .map_err(|e| format!("Invalid date: {e}"))
}

fn parse_category(s: &str) -> Result<Category, String> {
    match Category::from_tag(s) {
        Category::Unknown(tag) => Err(format!(
            "Unknown category '{tag}'. Use D-DAY, ANNIVERSARY, YEARLY or MONTHLY"
        )),
        category => Ok(category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("YEARLY"), Ok(Category::Yearly));
        assert_eq!(parse_category("紀念日"), Ok(Category::Anniversary));
        assert!(parse_category("weekly").is_err());
    }

    #[test]
    fn test_validate_event_date() {
        assert_eq!(validate_event_date("2024/3/9"), Ok("2024/3/9".to_string()));
        assert_eq!(validate_event_date("2024/03/09"), Ok("2024/3/9".to_string()));
        assert!(validate_event_date("2024-03-09").is_err());
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "countdays", "add", "--title", "Trip", "--date", "2024/7/1", "--category", "MONTHLY", "--no-yearly",
        ])
        .unwrap();
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.title, "Trip");
                assert_eq!(args.category, Category::Monthly);
                assert!(args.no_yearly);
                assert!(!args.no_100_days);
            }
            _ => panic!("expected add"),
        }
        assert_eq!(cli.format, "text");
    }

    #[test]
    fn test_parse_global_after_subcommand() {
        let cli = Cli::try_parse_from(["countdays", "list", "--format", "json", "--today", "2024-06-10"]).unwrap();
        assert!(matches!(cli.command, Command::List));
        assert_eq!(cli.format, "json");
        assert_eq!(cli.today.as_deref(), Some("2024-06-10"));
    }

    #[test]
    fn test_parse_edit_flags() {
        let cli = Cli::try_parse_from(["countdays", "edit", "3", "--show-notification", "false"]).unwrap();
        match cli.command {
            Command::Edit(args) => {
                assert_eq!(args.id, 3);
                assert_eq!(args.show_notification, Some(false));
                assert!(args.title.is_none());
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn test_parse_init_config() {
        let cli = Cli::try_parse_from(["countdays", "init-config", "--config", "/tmp/c.toml"]).unwrap();
        assert!(matches!(cli.command, Command::InitConfig));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_reorder_requires_ids() {
        assert!(Cli::try_parse_from(["countdays", "reorder"]).is_err());
    }
}
