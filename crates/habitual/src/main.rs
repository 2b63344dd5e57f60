//! habitual - command-line habit tracker
//!
//! This is the main entry point. It wires together:
//! - Configuration loading
//! - Store initialization
//! - The tracker (calendar views, statistics, entry toggling)
//! - The reminder worker

mod remind;
mod render;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use habitual_api::{EntryStatus, Habit, HabitPatch, HabitStatus, NewHabit, NotificationInterval};
use habitual_config::{load_config, load_config_or_default, Settings};
use habitual_core::{MonthCursor, Tracker};
use habitual_store::{import_file, write_export, SqliteStore, Store};
use habitual_util::{default_config_path, format_date, parse_date, HabitId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// habitual - Track daily habits from the command line
#[derive(Parser, Debug)]
#[command(name = "habitual")]
#[command(about = "Track daily habits from the command line", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/habitual/config.toml)
    #[arg(short, long, env = "HABITUAL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Data directory override (or set HABITUAL_DATA_DIR env var)
    #[arg(short, long, env = "HABITUAL_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a habit
    Add {
        name: String,

        /// Display color (default from config)
        #[arg(long)]
        color: Option<String>,

        /// First active day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// Last active day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// in_progress, done or abandoned
        #[arg(long)]
        status: Option<HabitStatus>,

        /// none, every_10s, hourly, every_2h, every_4h, daily or weekly
        #[arg(long)]
        remind: Option<NotificationInterval>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Change a habit's fields
    Edit {
        /// Habit name or id
        habit: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long, value_parser = parse_date, conflicts_with = "clear_start")]
        start: Option<NaiveDate>,

        /// Make the habit active from the beginning of time
        #[arg(long)]
        clear_start: bool,

        #[arg(long, value_parser = parse_date, conflicts_with = "clear_end")]
        end: Option<NaiveDate>,

        /// Make the habit active indefinitely
        #[arg(long)]
        clear_end: bool,

        #[arg(long)]
        status: Option<HabitStatus>,

        #[arg(long)]
        remind: Option<NotificationInterval>,

        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,

        #[arg(long)]
        clear_description: bool,
    },

    /// Delete a habit and all of its entries
    Delete {
        /// Habit name or id
        habit: String,
    },

    /// List habits
    List,

    /// Show one habit in detail
    Show {
        /// Habit name or id
        habit: String,
    },

    /// Record a day as done (or skipped)
    Mark {
        /// Habit name or id
        habit: String,

        /// Day to mark (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Record the day as skipped instead of done
        #[arg(long)]
        skip: bool,
    },

    /// Flip a day between done and skipped
    Toggle {
        /// Habit name or id
        habit: String,

        /// Day to toggle (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Show a week of completions
    Week {
        /// Any day in the week (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Weeks to move forward (negative moves back)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },

    /// Show a month calendar
    Month {
        #[arg(long, requires = "month")]
        year: Option<i32>,

        #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Months to move forward (negative moves back)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },

    /// Show statistics for a year
    Stats {
        /// Calendar year (default: current year)
        #[arg(long)]
        year: Option<i32>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write all habits and entries to a JSON file
    Export {
        /// Output file (default: export.json in the data directory)
        file: Option<PathBuf>,
    },

    /// Replace all habits and entries with the contents of a JSON export
    Import { file: PathBuf },

    /// Deliver reminders until interrupted
    Remind {
        /// Check once and exit
        #[arg(long)]
        once: bool,
    },
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => {
            let path = default_config_path();
            load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
    };

    if let Some(data_dir) = &args.data_dir {
        settings.tracker.data_dir = data_dir.clone();
    }

    Ok(settings)
}

fn open_tracker(settings: &Settings) -> Result<Arc<Tracker>> {
    let data_dir = &settings.tracker.data_dir;
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let db_path = settings.tracker.database_path();
    let store: Arc<dyn Store> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?,
    );

    debug!(db_path = %db_path.display(), "Store initialized");
    Ok(Arc::new(Tracker::new(store, settings.tracker.week_start)))
}

/// Find a habit by exact id, by name (case-insensitive), or by id prefix
fn resolve_habit(store: &dyn Store, key: &str) -> Result<Habit> {
    let key = key.trim();
    if key.is_empty() {
        bail!("Habit name or id cannot be empty");
    }

    let habits = store.list_habits()?;

    if let Ok(id) = key.parse::<HabitId>()
        && let Some(habit) = habits.iter().find(|h| h.id == id)
    {
        return Ok(habit.clone());
    }

    let by_name: Vec<&Habit> = habits
        .iter()
        .filter(|h| h.name.to_lowercase() == key.to_lowercase())
        .collect();
    let matches = if by_name.is_empty() {
        habits
            .iter()
            .filter(|h| h.id.to_string().starts_with(key))
            .collect()
    } else {
        by_name
    };

    match matches.as_slice() {
        [habit] => Ok((*habit).clone()),
        [] => bail!("No habit matches '{}'", key),
        _ => bail!("'{}' matches {} habits; use the id instead", key, matches.len()),
    }
}

async fn run_command(tracker: Arc<Tracker>, settings: &Settings, command: Command) -> Result<()> {
    let store = tracker.store().as_ref();

    match command {
        Command::Add {
            name,
            color,
            start,
            end,
            status,
            remind,
            description,
        } => {
            let mut habit = NewHabit::new(
                name,
                color.unwrap_or_else(|| settings.tracker.default_color.clone()),
            )
            .with_window(start, end)
            .with_status(status.unwrap_or_default())
            .with_notification_interval(remind.unwrap_or_default());
            if let Some(description) = description {
                habit = habit.with_description(description);
            }

            let id = store.create_habit(habit).context("Failed to create habit")?;
            println!("Created habit {}", id);
        }

        Command::Edit {
            habit,
            name,
            color,
            start,
            clear_start,
            end,
            clear_end,
            status,
            remind,
            description,
            clear_description,
        } => {
            let habit = resolve_habit(store, &habit)?;
            let patch = HabitPatch {
                name,
                color,
                description: clearable(description, clear_description),
                start_date: clearable(start, clear_start),
                end_date: clearable(end, clear_end),
                status,
                notification_interval: remind,
            };
            if patch.is_empty() {
                bail!("Nothing to change; pass at least one field to edit");
            }

            let updated = store
                .update_habit(&habit.id, &patch)
                .with_context(|| format!("Failed to update habit '{}'", habit.name))?;
            println!("{}", render::habit_details(&updated, done_this_year(&tracker, &updated)?));
        }

        Command::Delete { habit } => {
            let habit = resolve_habit(store, &habit)?;
            store.delete_habit(&habit.id)?;
            println!("Deleted habit '{}'", habit.name);
        }

        Command::List => {
            println!("{}", render::habit_table(&store.list_habits()?));
        }

        Command::Show { habit } => {
            let habit = resolve_habit(store, &habit)?;
            println!("{}", render::habit_details(&habit, done_this_year(&tracker, &habit)?));
        }

        Command::Mark { habit, date, skip } => {
            let habit = resolve_habit(store, &habit)?;
            let date = date.unwrap_or_else(habitual_util::today);
            let status = if skip { EntryStatus::Skipped } else { EntryStatus::Done };

            let entry = tracker.mark(&habit.id, date, status)?;
            println!("{} on {}: {}", habit.name, format_date(entry.date), entry.status);
        }

        Command::Toggle { habit, date } => {
            let habit = resolve_habit(store, &habit)?;
            let date = date.unwrap_or_else(habitual_util::today);

            let entry = tracker.toggle_entry(&habit.id, date)?;
            println!("{} on {}: {}", habit.name, format_date(entry.date), entry.status);
        }

        Command::Week { date, offset } => {
            let cursor = match date {
                Some(date) => tracker.week_containing(date)?,
                None => tracker.current_week()?,
            };
            let cursor = cursor
                .shift(offset)
                .with_context(|| format!("Week offset {} is out of range", offset))?;
            let view = tracker.week_view(cursor)?;
            println!("{}", render::week_table(&view));
        }

        Command::Month {
            year,
            month,
            offset,
        } => {
            let cursor = match (year, month) {
                (Some(year), Some(month)) => MonthCursor::new(year, month)
                    .with_context(|| format!("Invalid month {}-{}", year, month))?,
                _ => MonthCursor::today(),
            };
            let cursor = cursor
                .shift(offset)
                .with_context(|| format!("Month offset {} is out of range", offset))?;
            let grid = tracker.month_view(cursor)?;
            println!("{}", render::month_calendar(&grid));
        }

        Command::Stats { year, json } => {
            let year = year.unwrap_or_else(|| habitual_util::today().year());
            let stats = tracker.year_stats(year)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", render::year_report(&stats));
            }
        }

        Command::Export { file } => {
            let path = file.unwrap_or_else(|| settings.tracker.export_path());
            let data = write_export(store, &path, habitual_util::now())
                .with_context(|| format!("Failed to export to {:?}", path))?;
            println!(
                "Exported {} habits and {} entries to {}",
                data.habits.len(),
                data.entries.len(),
                path.display()
            );
        }

        Command::Import { file } => {
            let summary = import_file(store, &file)
                .with_context(|| format!("Failed to import {:?}", file))?;
            println!(
                "Imported {} habits and {} entries",
                summary.habits, summary.entries
            );
        }

        Command::Remind { once: true } => {
            if remind::run_once(&tracker)? == 0 {
                println!("No reminders due");
            }
        }

        Command::Remind { once: false } => {
            if !settings.reminders.enabled {
                println!("Reminders are disabled in the configuration");
                return Ok(());
            }
            info!("Starting reminder worker");
            remind::run(tracker.clone(), &settings.reminders).await?;
        }
    }

    Ok(())
}

/// `Some(None)` when clearing, `Some(Some(v))` when setting, `None` otherwise
fn clearable<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear { Some(None) } else { value.map(Some) }
}

fn done_this_year(tracker: &Tracker, habit: &Habit) -> Result<u32> {
    let stats = tracker.year_stats(habitual_util::today().year())?;
    Ok(stats
        .per_habit
        .iter()
        .find(|t| t.habit_id == habit.id)
        .map_or(0, |t| t.done))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), "habitual starting");

    let settings = load_settings(&args)?;
    let tracker = open_tracker(&settings)?;

    run_command(tracker, &settings, args.command).await
}
