//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DailyCheck - per-user daily checklists for Discord
#[derive(Parser)]
#[command(
    name = "dc",
    about = "Discord bot for per-user daily task checklists",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Override the data directory from the config file
    #[arg(short, long = "data-dir", global = true, help = "Directory holding config.json and checklists.json")]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Connect to Discord and run the daily reset (default)
    Run,

    /// Print the configured task list
    Tasks,

    /// Print a user's stored checklist
    Show {
        /// Discord user id
        user_id: String,
    },

    /// Clear every completion flag now
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["dc"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dc", "show", "1234", "--data-dir", "/tmp/dc", "-l", "debug"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Show { ref user_id }) if user_id == "1234"));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/dc")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_show_requires_user() {
        assert!(Cli::try_parse_from(["dc", "show"]).is_err());
    }
}
