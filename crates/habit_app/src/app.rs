use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use habit_core::reminder::{Reminder, Repeat, ReminderDraft};
use habit_core::{ReminderService, TodaySnapshot};
use tracing::info;

#[derive(Parser)]
#[command(name = "habits", version, about = "Habit and reminder tracker")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's reminders and progress (the default).
    Today,
    /// List every reminder, newest first.
    All,
    /// Create a reminder.
    Add {
        /// Reminder title.
        #[arg(required = true)]
        title: Vec<String>,
        /// Recurrence rule.
        #[arg(long, value_enum, default_value_t = RepeatArg::None)]
        repeat: RepeatArg,
        /// Completions per period.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        times: u32,
        /// Display icon tag.
        #[arg(long, default_value = "pencil")]
        icon: String,
        /// Anchor date, YYYY-MM-DD (defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Mark one completion, by position in the today list.
    Done { position: usize },
    /// Undo one completion, by position in the today list.
    Undo { position: usize },
    /// Delete a reminder, by position in the all list.
    Rm { position: usize },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RepeatArg {
    None,
    Daily,
    Weekly,
    Monthly,
}

impl From<RepeatArg> for Repeat {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::None => Repeat::NoRepeat,
            RepeatArg::Daily => Repeat::Daily,
            RepeatArg::Weekly => Repeat::Weekly,
            RepeatArg::Monthly => Repeat::Monthly,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let data_dir = std::env::var_os("HABIT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        Self { data_dir }
    }
}

fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".habits"))
        .unwrap_or_else(|| PathBuf::from(".habits"))
}

pub fn run(config: AppConfig, cli: Cli) -> Result<()> {
    info!(data_dir = %config.data_dir.display(), "starting");
    // Building the service runs the rollover pass, so every command below
    // sees current counters.
    let service = ReminderService::builder()
        .data_dir(&config.data_dir)
        .build()?;

    match cli.command.unwrap_or(Commands::Today) {
        Commands::Today => print_today(&service.today()),
        Commands::All => print_all(&service),
        Commands::Add {
            title,
            repeat,
            times,
            icon,
            date,
        } => {
            let start_time = Utc::now();
            let draft = ReminderDraft {
                icon,
                title: title.join(" "),
                date: date.unwrap_or_else(|| Local::now().date_naive()),
                start_time,
                end_time: start_time + Duration::hours(1),
                repeat: repeat.into(),
                frequency: times,
            };
            let reminder = service.create(draft)?;
            println!("Added \"{}\" ({})", reminder.title, reminder.repeat.as_str());
            Ok(())
        }
        Commands::Done { position } => tap(&service, position, true),
        Commands::Undo { position } => tap(&service, position, false),
        Commands::Rm { position } => {
            let all = service.all();
            let reminder = pick(&all, position)?;
            service.delete(reminder.id)?;
            println!("Removed \"{}\"", reminder.title);
            Ok(())
        }
    }
}

fn print_today(snapshot: &TodaySnapshot) -> Result<()> {
    let progress = snapshot.progress;
    println!(
        "Daily Progress: {}/{} completed, {} remaining",
        progress.completed, progress.total, progress.remaining
    );
    if snapshot.reminders.is_empty() {
        println!("Nothing due today.");
        return Ok(());
    }
    for (idx, reminder) in snapshot.reminders.iter().enumerate() {
        let mark = if reminder.is_complete() { "x" } else { " " };
        println!(
            "{:>3}. [{mark}] {}  {}/{}  ({})",
            idx + 1,
            reminder.title,
            reminder.completed_count,
            reminder.frequency,
            reminder.repeat.as_str()
        );
    }
    Ok(())
}

fn print_all(service: &ReminderService) -> Result<()> {
    let reminders = service.all();
    if reminders.is_empty() {
        println!("No reminders yet. Add one with `habits add <title>`.");
        return Ok(());
    }
    for (idx, reminder) in reminders.iter().enumerate() {
        println!(
            "{:>3}. {}  {}/{}  ({}, since {})",
            idx + 1,
            reminder.title,
            reminder.completed_count,
            reminder.frequency,
            reminder.repeat.as_str(),
            reminder.date
        );
    }
    Ok(())
}

fn tap(service: &ReminderService, position: usize, forward: bool) -> Result<()> {
    let snapshot = service.today();
    let reminder = pick(&snapshot.reminders, position)?;
    let updated = if forward {
        service.complete(reminder.id)?
    } else {
        service.uncomplete(reminder.id)?
    };
    if let Some(updated) = updated {
        println!(
            "{}  {}/{}",
            updated.title, updated.completed_count, updated.frequency
        );
    }
    Ok(())
}

fn pick(reminders: &[Reminder], position: usize) -> Result<&Reminder> {
    reminders
        .get(position.checked_sub(1).context("list positions start at 1")?)
        .with_context(|| format!("no reminder at position {position}"))
}
