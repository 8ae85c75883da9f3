//! Per-record transforms applied by `fixture_list` entries.

use sandbox_types::RecordTransform;
use sandbox_util::{truncate_chars, value_to_text};
use serde_json::{Map, Value, json};

/// Maximum characters of a message body kept in an inbox summary snippet.
pub const SNIPPET_MAX_CHARS: usize = 100;

/// Apply `transform` to every record, preserving order.
pub fn apply_transform(transform: RecordTransform, records: Vec<Value>) -> Vec<Value> {
    match transform {
        RecordTransform::InboxSummary => records.iter().map(inbox_summary).collect(),
    }
}

/// Reduce a message record to id, sender, subject, snippet, timestamp, labels, and urgency.
///
/// Records that are not objects are summarized as if empty.
fn inbox_summary(record: &Value) -> Value {
    let empty = Map::new();
    let fields = record.as_object().unwrap_or(&empty);
    let field = |name: &str| fields.get(name).cloned().unwrap_or(Value::Null);

    let snippet = match fields.get("body") {
        None | Some(Value::Null) => String::new(),
        Some(body) => truncate_chars(&value_to_text(body), SNIPPET_MAX_CHARS).to_string(),
    };

    json!({
        "id": field("id"),
        "sender": field("sender"),
        "subject": field("subject"),
        "snippet": snippet,
        "received_ts": fields.get("received_ts").cloned().unwrap_or_else(|| json!("")),
        "labels": fields.get("labels").cloned().unwrap_or_else(|| json!([])),
        "is_urgent": fields.get("is_urgent").cloned().unwrap_or(Value::Bool(false)),
    })
}
