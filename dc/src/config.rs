//! DailyCheck configuration types and loading

use chrono::NaiveTime;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main DailyCheck configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Discord connection and command settings
    pub discord: DiscordConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Daily reset schedule
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::default_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read the config without logging, before logging is set up
    ///
    /// Used for the log level and log directory; errors are reported later by
    /// [`Config::load`].
    pub fn peek(config_path: Option<&PathBuf>) -> Option<Self> {
        let path = match config_path {
            Some(path) => path.clone(),
            None => Self::default_paths().into_iter().find(|p| p.exists())?,
        };
        let content = fs::read_to_string(path).ok()?;
        serde_yaml::from_str(&content).ok()
    }

    /// Check the settings needed to connect before starting the bot
    pub fn validate(&self) -> Result<()> {
        self.discord.token()?;
        self.schedule.reset_time()?;
        if self.discord.prefix.trim().is_empty() {
            return Err(eyre::eyre!("discord.prefix cannot be empty"));
        }
        Ok(())
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".dailycheck.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("dailycheck").join("dailycheck.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Discord settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Environment variable containing the bot token
    #[serde(rename = "token-env")]
    pub token_env: String,

    /// Command prefix
    pub prefix: String,

    /// Title of the checklist embed
    pub title: String,

    /// Remove a member's checklist when they leave the guild
    #[serde(rename = "evict-departed-members")]
    pub evict_departed_members: bool,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token_env: "DISCORD_BOT_TOKEN".to_string(),
            prefix: "!".to_string(),
            title: "New World Dailies".to_string(),
            evict_departed_members: false,
        }
    }
}

impl DiscordConfig {
    /// Read the bot token from the configured environment variable
    pub fn token(&self) -> Result<String> {
        let token = std::env::var(&self.token_env)
            .map_err(|_| eyre::eyre!("Discord bot token not found. Set the {} environment variable.", self.token_env))?;
        if token.trim().is_empty() {
            return Err(eyre::eyre!("{} is set but empty", self.token_env));
        }
        Ok(token)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding config.json and checklists.json
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/dailycheck on Linux)
        let data_dir = dirs::data_dir()
            .map(|d| d.join("dailycheck"))
            .unwrap_or_else(|| PathBuf::from("data"));
        Self { data_dir }
    }
}

impl StorageConfig {
    /// Directory holding `dailycheck.log`
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Daily reset schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Local wall-clock time of the daily reset, "HH:MM"
    #[serde(rename = "reset-time")]
    pub reset_time: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            reset_time: "00:00".to_string(),
        }
    }
}

impl ScheduleConfig {
    pub fn reset_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(self.reset_time.trim(), "%H:%M")
            .context(format!("Invalid reset-time '{}', expected HH:MM", self.reset_time))
    }
}
