//! Chat command parsing

use thiserror::Error;

/// A recognized bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Set the role allowed to use checklists
    SetRole(u64),
    /// Append a task to the global list
    AddTask(String),
    /// Remove the task with this 1-based number
    RemoveTask(usize),
    /// Show the configured task list
    ListTasks,
    /// Show the caller's checklist
    Dailies,
    /// Toggle the caller's task with this 1-based number
    Done(usize),
    /// Show the command reference
    Help,
}

impl BotCommand {
    /// Commands reserved for guild administrators
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::SetRole(_) | Self::AddTask(_) | Self::RemoveTask(_) | Self::ListTasks
        )
    }

    /// Commands that need the configured checklist role
    pub fn requires_role(&self) -> bool {
        matches!(self, Self::Dailies | Self::Done(_))
    }
}

/// A recognized command with bad arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Usage: `{usage}`")]
pub struct UsageError {
    pub usage: String,
}

/// Parse a message into a command
///
/// Returns `None` if the message does not start with `prefix` followed by a
/// known command name. Names are case-sensitive; the Portuguese names are
/// accepted as aliases.
pub fn parse(prefix: &str, content: &str) -> Option<Result<BotCommand, UsageError>> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let usage = |u: &str| UsageError {
        usage: format!("{prefix}{u}"),
    };

    let parsed = match name {
        "set_role" | "configurar_role" => parse_role(args)
            .map(BotCommand::SetRole)
            .ok_or_else(|| usage("set_role <@role>")),
        "add_task" => {
            if args.is_empty() {
                Err(usage("add_task <description>"))
            } else {
                Ok(BotCommand::AddTask(args.to_string()))
            }
        }
        "remove_task" | "remover_tarefa" => args
            .parse()
            .map(BotCommand::RemoveTask)
            .map_err(|_| usage("remove_task <number>")),
        "list_tasks" | "listar_tarefas_admin" => Ok(BotCommand::ListTasks),
        "dailies" | "NWDailies" => Ok(BotCommand::Dailies),
        "done" => args.parse().map(BotCommand::Done).map_err(|_| usage("done <number>")),
        "help_dailies" => Ok(BotCommand::Help),
        _ => return None,
    };

    Some(parsed)
}

/// Parse a role mention (`<@&id>`) or a bare role id
pub fn parse_role(arg: &str) -> Option<u64> {
    let arg = arg.trim();
    let id = arg
        .strip_prefix("<@&")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(arg);
    id.parse().ok().filter(|id| *id != 0)
}
