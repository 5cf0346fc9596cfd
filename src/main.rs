mod cli;
mod config;
mod date;
mod error;
mod notify;
mod recurrence;
mod render;
mod store;
mod types;
mod view;

use chrono::NaiveDate;
use clap::Parser;
use std::io::{self, Write};

use cli::{AddArgs, Cli, Command, EditArgs};
use config::Config;
use error::AppResult;
use notify::{run_daily_job, ConsoleNotifier, JobSettings, Notifier};
use store::EventStore;
use types::{Event, EventInput};
use view::{detail_view, list_rows};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Diagnostics go to stderr so rendered output stays clean on stdout
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let config_path = match cli.config {
        Some(ref path) => path.clone(),
        None => Config::config_path()?,
    };
    if let Command::InitConfig = cli.command {
        return init_config(&config_path);
    }

    let mut config = Config::load(&config_path)?;
    if let Some(ref db) = cli.db {
        config.database = db.clone();
    }
    if cli.tz.is_some() {
        config.timezone = cli.tz.clone();
    }

    let today = match cli.today {
        Some(ref s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")?,
        None => date::today(config.timezone.as_deref())?,
    };
    tracing::debug!(%today, db = %config.database.display(), "starting");

    let mut store = EventStore::open(&config.database)?;
    let output = run_command(cli.command, &cli.format, &mut store, &config, today)?;
    io::stdout().write_all(output.as_bytes())?;

    Ok(())
}

fn run_command(
    command: Command,
    format: &str,
    store: &mut EventStore,
    config: &Config,
    today: NaiveDate,
) -> AppResult<String> {
    let output = match command {
        Command::Add(args) => {
            let event = store.insert(&add_input(args))?;
            render_event(&event, format)?
        }
        Command::Edit(args) => {
            let id = args.id;
            let current = store.get(id)?;
            let event = store.update(id, &edit_input(&current, args))?;
            if current.show_notification && !event.show_notification {
                ConsoleNotifier::new(io::stdout()).cancel(id)?;
            }
            render_event(&event, format)?
        }
        Command::Delete { id } => {
            let event = store.delete(id)?;
            if event.show_notification {
                ConsoleNotifier::new(io::stdout()).cancel(id)?;
            }
            render_event(&event, format)?
        }
        Command::List => {
            let rows = list_rows(store.list_all()?, today, config.leap_day);
            match format {
                "json" => serde_json::to_string_pretty(&rows)? + "\n",
                "md" => render::render_list_markdown(&rows),
                _ => render::render_list_text(&rows),
            }
        }
        Command::Show { id } => {
            let view = detail_view(store.get(id)?, today, config);
            match format {
                "json" => serde_json::to_string_pretty(&view)? + "\n",
                "md" => render::render_detail_markdown(&view, config.language),
                _ => render::render_detail_text(&view, config.language),
            }
        }
        Command::Reorder { ids } => {
            store.reorder(&ids)?;
            let rows = list_rows(store.list_all()?, today, config.leap_day);
            match format {
                "json" => serde_json::to_string_pretty(&rows)? + "\n",
                "md" => render::render_list_markdown(&rows),
                _ => render::render_list_text(&rows),
            }
        }
        Command::InitConfig => String::new(),
        Command::Notify { force } => {
            let events = store.list_all()?;
            let last_run = store.last_notify_run()?;
            let settings = JobSettings {
                language: config.language,
                leap_day: config.leap_day,
            };
            let mut notifier = ConsoleNotifier::new(io::stdout());
            let outcome = run_daily_job(&events, &mut notifier, last_run, today, settings, force);
            if outcome.ran {
                store.set_last_notify_run(today)?;
            }
            match format {
                "json" => serde_json::to_string_pretty(&outcome)? + "\n",
                _ => String::new(),
            }
        }
    };
    Ok(output)
}

/// Write default settings unless a config file already exists
fn init_config(path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
    } else {
        Config::default().save(path)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn add_input(args: AddArgs) -> EventInput {
    let mut input = EventInput::new(&args.title, &args.date, args.category);
    input.image = args.image;
    input.show_notification = args.show_notification;
    input.notify_100_days = !args.no_100_days;
    input.notify_yearly = !args.no_yearly;
    input
}

fn edit_input(current: &Event, args: EditArgs) -> EventInput {
    let mut input = EventInput::from(current);
    if let Some(title) = args.title {
        input.title = title;
    }
    if let Some(date) = args.date {
        input.date = date;
    }
    if let Some(category) = args.category {
        input.category = category;
    }
    if args.clear_image {
        input.image = None;
    } else if let Some(image) = args.image {
        input.image = Some(image);
    }
    if let Some(v) = args.show_notification {
        input.show_notification = v;
    }
    if let Some(v) = args.notify_100_days {
        input.notify_100_days = v;
    }
    if let Some(v) = args.notify_yearly {
        input.notify_yearly = v;
    }
    input
}

fn render_event(event: &Event, format: &str) -> AppResult<String> {
    Ok(match format {
        "json" => serde_json::to_string_pretty(event)? + "\n",
        _ => format!("{}  {}  {} ({})\n", event.id, event.title, event.date, event.category.tag()),
    })
}
