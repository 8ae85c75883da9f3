//! Alias-tolerant argument lookup.
//!
//! Callers name the same parameter differently (`message_id`, `messageId`, `id`, ...). Each
//! behavior declares an alias list in priority order and takes the first present, non-null value.

use sandbox_util::value_to_text;
use serde_json::{Map, Value};

/// Aliases for the id of the message being replied to.
pub const MESSAGE_ID_ALIASES: &[&str] = &["message_id", "messageId", "email_id", "emailId", "id"];
/// Aliases for free-text drafting instructions.
pub const INSTRUCTION_ALIASES: &[&str] = &["instructions", "body", "content", "text", "reply", "message"];
/// Aliases for a note path.
pub const NOTE_PATH_ALIASES: &[&str] = &["path", "key"];
/// Aliases for a chat channel identifier.
pub const CHANNEL_ALIASES: &[&str] = &["channel", "channel_id", "channelId"];
/// Aliases for a search query.
pub const QUERY_ALIASES: &[&str] = &["query", "q"];

/// First present, non-null value among `aliases`.
pub fn resolve_alias<'a>(args: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| args.get(*alias))
        .find(|value| !value.is_null())
}

/// First present, non-null value among `aliases`, rendered as text, else `default`.
pub fn resolve_alias_text(args: &Map<String, Value>, aliases: &[&str], default: &str) -> String {
    resolve_alias(args, aliases).map(value_to_text).unwrap_or_else(|| default.to_string())
}
