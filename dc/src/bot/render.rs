//! Message and embed rendering

use dailystore::{Checklist, ChecklistEntry};
use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter};

/// Discord allows at most 25 fields per embed
pub const MAX_EMBED_FIELDS: usize = 25;

/// Discord limits, in characters
pub const MAX_FIELD_NAME_CHARS: usize = 256;
pub const MAX_DESCRIPTION_CHARS: usize = 4096;
pub const MAX_EMBED_CHARS: usize = 6000;

const CHECKLIST_COLOUR: Colour = Colour::new(0x2ECC71);
const INFO_COLOUR: Colour = Colour::new(0x3498DB);

/// Zero-width space, for fields that only need a name
const BLANK: &str = "\u{200b}";

pub const NO_TASKS: &str = "📋 No tasks configured yet!";
pub const GUILD_ONLY: &str = "❌ This command can only be used in a server!";
pub const NOT_ADMIN: &str = "❌ Only administrators can use this command!";
pub const ROLE_NOT_CONFIGURED: &str = "❌ An administrator has not configured the checklist role yet!";
pub const NO_PERMISSION: &str = "❌ You don't have permission to use the checklists!";
pub const INVALID_TASK_NUMBER: &str = "❌ Invalid task number!";
pub const ROLE_NOT_FOUND: &str = "❌ That role does not exist in this server!";
pub const INTERNAL_ERROR: &str = "⚠️ Something went wrong, please try again later.";

/// Field name for one checklist entry, e.g. `✅ 1. Run the dungeon`
pub fn entry_line(slot: usize, entry: &ChecklistEntry) -> String {
    let status = if entry.completed { "✅" } else { "⬜" };
    format!("{} {}. {}", status, slot + 1, entry.description)
}

pub fn progress_footer(checklist: &Checklist) -> String {
    format!(
        "Progress: {}/{} tasks completed",
        checklist.completed_count(),
        checklist.len()
    )
}

/// Cut `text` to at most `max` characters, marking the cut with `…`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Numbered task list, one task per line
pub fn task_lines(tasks: &[String]) -> String {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| format!("{}. {}", i + 1, task))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checklist embed, one field per slot
///
/// Fields stop once Discord's field count or total size would be exceeded;
/// the footer always counts every task.
pub fn checklist_embed(title: &str, hint: &str, checklist: &Checklist) -> CreateEmbed {
    let title = format!("📋 {title}");
    let footer = progress_footer(checklist);
    let mut budget = MAX_EMBED_CHARS.saturating_sub(title.chars().count() + hint.chars().count() + footer.chars().count());

    let mut fields = Vec::new();
    for (slot, entry) in checklist.iter().take(MAX_EMBED_FIELDS) {
        let name = truncate(&entry_line(*slot, entry), MAX_FIELD_NAME_CHARS);
        let size = name.chars().count() + BLANK.chars().count();
        if size > budget {
            break;
        }
        budget -= size;
        fields.push((name, BLANK, false));
    }

    CreateEmbed::new()
        .title(title)
        .description(hint)
        .colour(CHECKLIST_COLOUR)
        .fields(fields)
        .footer(CreateEmbedFooter::new(footer))
}

pub fn task_list_embed(tasks: &[String]) -> CreateEmbed {
    CreateEmbed::new()
        .title("📋 Configured Daily Tasks")
        .colour(INFO_COLOUR)
        .description(truncate(&task_lines(tasks), MAX_DESCRIPTION_CHARS))
}

pub fn help_embed(prefix: &str) -> CreateEmbed {
    let user = [
        format!("`{prefix}dailies` - Show your personal checklist"),
        format!("`{prefix}done <number>` - Check/uncheck a task"),
        format!("`{prefix}help_dailies` - Show this message"),
    ]
    .join("\n");

    let admin = [
        format!("`{prefix}set_role <@role>` - Set the role with checklist access"),
        format!("`{prefix}add_task <description>` - Add a daily task"),
        format!("`{prefix}remove_task <number>` - Remove a task"),
        format!("`{prefix}list_tasks` - List all configured tasks"),
    ]
    .join("\n");

    CreateEmbed::new()
        .title("📚 Checklist Bot Commands")
        .description("Here are all available commands:")
        .colour(INFO_COLOUR)
        .field("👤 User Commands", user, false)
        .field("👑 Administrator Commands", admin, false)
        .footer(CreateEmbedFooter::new("Checklists reset automatically every day!"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checklist(entries: &[(&str, bool)]) -> Checklist {
        entries
            .iter()
            .enumerate()
            .map(|(i, (d, c))| (i, ChecklistEntry::new(*d, *c)))
            .collect()
    }

    #[test]
    fn test_entry_line() {
        assert_eq!(entry_line(0, &ChecklistEntry::new("Dungeon", true)), "✅ 1. Dungeon");
        assert_eq!(entry_line(4, &ChecklistEntry::new("Gather", false)), "⬜ 5. Gather");
    }

    #[test]
    fn test_progress_footer() {
        let list = checklist(&[("A", true), ("B", false), ("C", true)]);
        assert_eq!(progress_footer(&list), "Progress: 2/3 tasks completed");
        assert_eq!(progress_footer(&Checklist::new()), "Progress: 0/0 tasks completed");
    }

    #[test]
    fn test_task_lines() {
        let tasks = vec!["A".to_string(), "B".to_string()];
        assert_eq!(task_lines(&tasks), "1. A\n2. B");
        assert_eq!(task_lines(&[]), "");
    }

    #[test]
    fn test_checklist_embed_caps_fields() {
        let entries: Vec<(&str, bool)> = (0..30).map(|_| ("task", false)).collect();
        let list = checklist(&entries);

        let json = serde_json::to_value(checklist_embed("Dailies", "hint", &list)).unwrap();
        assert_eq!(json["fields"].as_array().unwrap().len(), MAX_EMBED_FIELDS);
        assert_eq!(json["footer"]["text"], "Progress: 0/30 tasks completed");
    }

    fn embed_chars(json: &serde_json::Value) -> usize {
        let text = |v: &serde_json::Value| v.as_str().map_or(0, |s| s.chars().count());
        let fields: usize = json["fields"]
            .as_array()
            .map(|fields| fields.iter().map(|f| text(&f["name"]) + text(&f["value"])).sum())
            .unwrap_or(0);
        text(&json["title"]) + text(&json["description"]) + text(&json["footer"]["text"]) + fields
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("ééééé", 3).chars().count(), 3);
    }

    #[test]
    fn test_checklist_embed_stays_within_discord_limits() {
        let long = "x".repeat(300);
        let entries: Vec<(&str, bool)> = (0..25).map(|_| (long.as_str(), false)).collect();
        let list = checklist(&entries);

        let json = serde_json::to_value(checklist_embed("New World Dailies", "Use `!done <number>`", &list)).unwrap();
        let fields = json["fields"].as_array().unwrap();
        assert!(!fields.is_empty());
        for field in fields {
            assert!(field["name"].as_str().unwrap().chars().count() <= MAX_FIELD_NAME_CHARS);
        }
        assert!(embed_chars(&json) <= MAX_EMBED_CHARS);
        assert_eq!(json["footer"]["text"], "Progress: 0/25 tasks completed");
    }

    #[test]
    fn test_task_list_embed_truncates_description() {
        let tasks: Vec<String> = (0..40).map(|_| "y".repeat(200)).collect();
        let json = serde_json::to_value(task_list_embed(&tasks)).unwrap();
        assert_eq!(json["description"].as_str().unwrap().chars().count(), MAX_DESCRIPTION_CHARS);
    }
}
