//! Serenity event handler: authorization and command dispatch

use async_trait::async_trait;
use dailystore::StoreError;
use serenity::all::{CreateEmbed, CreateMessage, GuildId, Member, RoleId, User};
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::command::{BotCommand, parse};
use super::render;
use crate::config::DiscordConfig;
use crate::state::{StateError, StateManager};

/// Errors while handling a command
#[derive(Debug, Error)]
enum HandlerError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("Discord API error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("Guild not found in cache")]
    GuildNotCached,
}

impl HandlerError {
    fn store(&self) -> Option<&StoreError> {
        match self {
            Self::State(StateError::Store(e)) => Some(e),
            _ => None,
        }
    }
}

/// What to send back for a command
#[derive(Debug)]
enum Reply {
    Text(String),
    Embed(CreateEmbed),
}

impl Reply {
    fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    async fn send(self, ctx: &Context, msg: &Message) -> serenity::Result<()> {
        match self {
            Self::Text(text) => {
                msg.channel_id.say(&ctx.http, text).await?;
            }
            Self::Embed(embed) => {
                msg.channel_id
                    .send_message(&ctx.http, CreateMessage::new().embed(embed))
                    .await?;
            }
        }
        Ok(())
    }
}

/// Decide whether a guild member may run `cmd`
///
/// Returns the denial reply, or `None` if access is granted. `is_admin` only
/// matters for admin commands and `role_id` only for checklist commands.
fn gate(cmd: &BotCommand, is_admin: bool, role_id: Option<u64>, member_roles: &[RoleId]) -> Option<&'static str> {
    if cmd.requires_admin() && !is_admin {
        return Some(render::NOT_ADMIN);
    }

    if cmd.requires_role() {
        let Some(role_id) = role_id.filter(|id| *id != 0) else {
            return Some(render::ROLE_NOT_CONFIGURED);
        };
        if !member_roles.contains(&RoleId::new(role_id)) {
            return Some(render::NO_PERMISSION);
        }
    }

    None
}

/// Discord event handler routing commands to the StateManager
pub struct Handler {
    state: StateManager,
    config: DiscordConfig,
}

impl Handler {
    pub fn new(state: StateManager, config: DiscordConfig) -> Self {
        Self { state, config }
    }

    fn is_admin(ctx: &Context, msg: &Message, member: &Member) -> Result<bool, HandlerError> {
        let guild = msg.guild(&ctx.cache).ok_or(HandlerError::GuildNotCached)?;
        Ok(guild.member_permissions(member).administrator())
    }

    async fn dispatch(&self, ctx: &Context, msg: &Message, cmd: BotCommand) -> Result<Reply, HandlerError> {
        debug!(?cmd, user = %msg.author.id, "dispatch: called");

        if cmd == BotCommand::Help {
            return Ok(Reply::Embed(render::help_embed(&self.config.prefix)));
        }

        let Some(guild_id) = msg.guild_id else {
            return Ok(Reply::text(render::GUILD_ONLY));
        };

        let member = msg.member(ctx).await?;
        let is_admin = cmd.requires_admin() && Self::is_admin(ctx, msg, &member)?;
        let role_id = if cmd.requires_role() {
            self.state.get_config().await?.role_id
        } else {
            None
        };

        if let Some(denied) = gate(&cmd, is_admin, role_id, &member.roles) {
            debug!(user = %msg.author.id, %denied, "dispatch: access denied");
            return Ok(Reply::text(denied));
        }

        let user_id = msg.author.id.to_string();

        match cmd {
            BotCommand::SetRole(role_id) => self.set_role(ctx, guild_id, role_id).await,
            BotCommand::AddTask(description) => match self.state.add_task(&description).await {
                Ok(change) => Ok(Reply::text(format!(
                    "✅ Task added: \"{}\"\n💡 All checklists have been updated!",
                    change.description
                ))),
                Err(StateError::Store(StoreError::InvalidArgument(reason))) => Ok(Reply::text(format!("❌ {reason}"))),
                Err(e) => Err(e.into()),
            },
            BotCommand::RemoveTask(number) => match self.state.remove_task(number).await {
                Ok(change) => Ok(Reply::text(format!(
                    "✅ Task removed: \"{}\"\n💡 All checklists have been updated!",
                    change.description
                ))),
                Err(StateError::Store(StoreError::InvalidArgument(_))) => {
                    Ok(Reply::text(render::INVALID_TASK_NUMBER))
                }
                Err(e) => Err(e.into()),
            },
            BotCommand::ListTasks => {
                let tasks = self.state.get_config().await?.tasks;
                if tasks.is_empty() {
                    return Ok(Reply::text(render::NO_TASKS));
                }
                Ok(Reply::Embed(render::task_list_embed(&tasks)))
            }
            BotCommand::Dailies => {
                let Some(checklist) = self.state.open_checklist(&user_id).await? else {
                    return Ok(Reply::text(render::NO_TASKS));
                };
                let hint = format!("Use `{}done <number>` to check off a task", self.config.prefix);
                Ok(Reply::Embed(render::checklist_embed(&self.config.title, &hint, &checklist)))
            }
            BotCommand::Done(number) => match self.state.toggle(&user_id, number).await {
                Ok(toggled) => {
                    let hint = format!("Use `{}done <number>` to check off another task", self.config.prefix);
                    Ok(Reply::Embed(render::checklist_embed(
                        &self.config.title,
                        &hint,
                        &toggled.checklist,
                    )))
                }
                Err(StateError::Store(StoreError::UserNotFound(_))) => Ok(Reply::text(format!(
                    "❌ You don't have a checklist yet! Use `{}dailies` first.",
                    self.config.prefix
                ))),
                Err(StateError::Store(StoreError::SlotNotFound { .. })) => {
                    Ok(Reply::text(render::INVALID_TASK_NUMBER))
                }
                Err(e) => Err(e.into()),
            },
            BotCommand::Help => Ok(Reply::Embed(render::help_embed(&self.config.prefix))),
        }
    }

    async fn set_role(&self, ctx: &Context, guild_id: GuildId, role_id: u64) -> Result<Reply, HandlerError> {
        let role_name = {
            let guild = ctx.cache.guild(guild_id).ok_or(HandlerError::GuildNotCached)?;
            guild.roles.get(&RoleId::new(role_id)).map(|role| role.name.clone())
        };

        let Some(role_name) = role_name else {
            return Ok(Reply::text(render::ROLE_NOT_FOUND));
        };

        self.state.set_role(role_id).await?;
        Ok(Reply::text(format!(
            "✅ Role set: {role_name}. Members with this role can now use the checklists!"
        )))
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("{} is online!", ready.user.name);
        info!(guilds = ready.guilds.len(), "Bot is in {} server(s)", ready.guilds.len());
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let Some(parsed) = parse(&self.config.prefix, &msg.content) else {
            return;
        };

        let reply = match parsed {
            Ok(cmd) => match self.dispatch(&ctx, &msg, cmd).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(error = %e, user = %msg.author.id, content = %msg.content, "Command failed");
                    match e.store() {
                        Some(StoreError::InvalidArgument(reason)) => Reply::text(format!("❌ {reason}")),
                        _ => Reply::text(render::INTERNAL_ERROR),
                    }
                }
            },
            Err(usage) => Reply::text(format!("❌ {usage}")),
        };

        if let Err(e) = reply.send(&ctx, &msg).await {
            error!(error = %e, channel = %msg.channel_id, "Failed to send reply");
            if let Err(e) = Reply::text(render::INTERNAL_ERROR).send(&ctx, &msg).await {
                error!(error = %e, channel = %msg.channel_id, "Failed to send fallback reply");
            }
        }
    }

    async fn guild_member_removal(
        &self,
        _ctx: Context,
        guild_id: GuildId,
        user: User,
        _member_data_if_available: Option<Member>,
    ) {
        if !self.config.evict_departed_members {
            return;
        }

        let user_id = user.id.to_string();
        match self.state.evict_user(&user_id).await {
            Ok(true) => info!(%user_id, %guild_id, "Evicted checklist of departed member"),
            Ok(false) => debug!(%user_id, "Departed member had no checklist"),
            Err(e) => warn!(error = %e, %user_id, "Failed to evict checklist of departed member"),
        }
    }
}
