//! DailyCheck - Discord checklist bot
//!
//! CLI entry point for running the bot and inspecting its data offline.

use std::fs;
use std::path::Path;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use dailycheck::bot::{self, entry_line, progress_footer};
use dailycheck::cli::{Cli, Command};
use dailycheck::config::Config;
use dailycheck::scheduler::DailyReset;
use dailycheck::state::StateManager;
use dailystore::{Dailies, StoreLock};

fn setup_logging(log_dir: &Path, cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("dailycheck.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Pick up DISCORD_BOT_TOKEN from a .env file if present
    let dotenv = dotenvy::dotenv().ok();

    // Peek at the config for the log level and directory before full loading
    let peeked = Config::peek(cli.config.as_ref()).unwrap_or_default();
    let mut storage = peeked.storage.clone();
    if let Some(dir) = &cli.data_dir {
        storage.data_dir = dir.clone();
    }
    let log_dir = storage.log_dir();

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(&log_dir, cli.log_level.as_deref(), peeked.log_level.as_deref())
        .context("Failed to setup logging")?;

    if let Some(path) = dotenv {
        debug!(path = %path.display(), "main: loaded .env");
    }

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        debug!(dir = %dir.display(), "main: data-dir overridden on command line");
        config.storage.data_dir = dir;
    }

    info!("DailyCheck using data directory {}", config.storage.data_dir.display());

    // Dispatch command
    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None | Some(Command::Run) => cmd_run(&config).await,
        Some(Command::Tasks) => cmd_tasks(&config),
        Some(Command::Show { user_id }) => cmd_show(&config, &user_id),
        Some(Command::Reset) => cmd_reset(&config),
    }
}

/// Run the bot and the daily reset until Ctrl+C
async fn cmd_run(config: &Config) -> Result<()> {
    debug!("cmd_run: called");
    config.validate().context("Invalid configuration")?;
    let reset_at = config.schedule.reset_time()?;

    let state = StateManager::spawn(&config.storage.data_dir)
        .context(format!("Failed to open data directory {}", config.storage.data_dir.display()))?;

    tokio::spawn(DailyReset::new(state.clone(), reset_at).run());

    let result = bot::run(config, state.clone()).await;

    if let Err(e) = state.shutdown().await {
        warn!(error = %e, "StateManager already stopped");
    }

    result
}

/// Lock the data directory and open the stores for an offline command
fn open_offline(config: &Config) -> Result<(StoreLock, Dailies)> {
    let data_dir = &config.storage.data_dir;
    let lock = StoreLock::acquire(data_dir).context("Data directory is in use (is the bot running?)")?;
    let dailies = Dailies::open(data_dir).context(format!("Failed to open data directory {}", data_dir.display()))?;
    Ok((lock, dailies))
}

fn cmd_tasks(config: &Config) -> Result<()> {
    debug!("cmd_tasks: called");
    let (_lock, dailies) = open_offline(config)?;
    let settings = dailies.config().get()?;

    match settings.role_id {
        Some(role_id) => println!("{} {}", "Role:".bold(), role_id),
        None => println!("{} {}", "Role:".bold(), "not configured".yellow()),
    }

    if settings.tasks.is_empty() {
        println!("No tasks configured yet!");
        return Ok(());
    }

    println!("{}", "Daily tasks".bright_cyan().bold());
    for (i, task) in settings.tasks.iter().enumerate() {
        println!("{:>3}. {}", i + 1, task);
    }
    Ok(())
}

fn cmd_show(config: &Config, user_id: &str) -> Result<()> {
    debug!(%user_id, "cmd_show: called");
    let (_lock, dailies) = open_offline(config)?;

    let Some(checklist) = dailies.checklists().get_user(user_id)? else {
        println!("No checklist stored for user {}", user_id);
        return Ok(());
    };

    println!("{} {}", "Checklist for".bright_cyan().bold(), user_id);
    for (slot, entry) in &checklist {
        let line = entry_line(*slot, entry);
        if entry.completed {
            println!("  {}", line.green());
        } else {
            println!("  {}", line);
        }
    }
    println!("{}", progress_footer(&checklist).dimmed());
    Ok(())
}

fn cmd_reset(config: &Config) -> Result<()> {
    debug!("cmd_reset: called");
    let (_lock, dailies) = open_offline(config)?;

    let cleared = dailies.checklists().reset_all()?;
    info!(cleared, "Manual reset complete");
    println!("Reset complete: cleared {} completion flag(s)", cleared);
    Ok(())
}
