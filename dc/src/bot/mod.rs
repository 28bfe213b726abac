//! Discord chat adapter
//!
//! Parses prefix commands, enforces the admin/role gate and renders replies.
//! All state changes go through the [`StateManager`].

mod command;
mod handler;
mod render;

pub use command::{BotCommand, UsageError, parse, parse_role};
pub use handler::Handler;
pub use render::{MAX_EMBED_FIELDS, checklist_embed, entry_line, help_embed, progress_footer, task_list_embed};

use eyre::{Context, Result};
use serenity::all::GatewayIntents;
use serenity::Client;
use tracing::{debug, info};

use crate::config::Config;
use crate::state::StateManager;

/// Gateway intents the bot needs to read commands and track members
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
}

/// Connect to Discord and process events until Ctrl+C
pub async fn run(config: &Config, state: StateManager) -> Result<()> {
    debug!("run: called");
    let token = config.discord.token()?;

    let handler = Handler::new(state, config.discord.clone());
    let mut client = Client::builder(&token, intents())
        .event_handler(handler)
        .await
        .context("Failed to create Discord client")?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, disconnecting from Discord");
            shard_manager.shutdown_all().await;
        }
    });

    info!("Connecting to Discord");
    client.start().await.context("Discord client stopped with an error")?;

    info!("Discord client stopped");
    Ok(())
}
