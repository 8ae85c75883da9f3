//! Placeholder rendering for write-action response templates.
//!
//! Templates use `{name}` placeholders with `{{`/`}}` as literal braces. `{ts}` resolves to the
//! call's timestamp token and any other name resolves to the matching input argument. If any
//! placeholder cannot be resolved, the template falls back to substituting only `{ts}` and
//! leaves everything else literal.

use sandbox_util::value_to_text;
use serde_json::{Map, Value};

/// Placeholder name bound to the per-call timestamp token.
pub const TIMESTAMP_PLACEHOLDER: &str = "ts";

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

/// Renders a template string against a timestamp token and the call arguments.
pub fn render_template(template: &str, timestamp: &str, args: &Map<String, Value>) -> String {
    let Some(segments) = parse_segments(template) else {
        return substitute_timestamp(template, timestamp);
    };

    let mut rendered = String::with_capacity(template.len());
    for segment in segments {
        match segment {
            Segment::Literal(text) => rendered.push_str(text),
            Segment::Brace(character) => rendered.push(character),
            Segment::Placeholder(name) if name == TIMESTAMP_PLACEHOLDER => rendered.push_str(timestamp),
            Segment::Placeholder(name) => match args.get(name) {
                Some(value) => rendered.push_str(&value_to_text(value)),
                None => return substitute_timestamp(template, timestamp),
            },
        }
    }
    rendered
}

/// Returns true when a template value needs rendering.
pub fn has_placeholders(template: &str) -> bool {
    template.contains('{')
}

fn substitute_timestamp(template: &str, timestamp: &str) -> String {
    template.replace("{ts}", timestamp)
}

/// Splits a template into segments; `None` when the template is malformed or uses a
/// placeholder that is not a plain identifier (positional, indexed, or formatted).
fn parse_segments(template: &str) -> Option<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut remainder = template;

    while let Some(index) = remainder.find(['{', '}']) {
        if index > 0 {
            segments.push(Segment::Literal(&remainder[..index]));
        }
        let after = &remainder[index..];
        if let Some(rest) = after.strip_prefix("{{") {
            segments.push(Segment::Brace('{'));
            remainder = rest;
        } else if let Some(rest) = after.strip_prefix("}}") {
            segments.push(Segment::Brace('}'));
            remainder = rest;
        } else if after.starts_with('}') {
            return None;
        } else {
            let close = after.find('}')?;
            let name = &after[1..close];
            if !is_identifier(name) {
                return None;
            }
            segments.push(Segment::Placeholder(name));
            remainder = &after[close + 1..];
        }
    }
    if !remainder.is_empty() {
        segments.push(Segment::Literal(remainder));
    }
    Some(segments)
}

fn is_identifier(name: &str) -> bool {
    let mut characters = name.chars();
    match characters.next() {
        Some(first) if first.is_alphabetic() || first == '_' => characters.all(|character| character.is_alphanumeric() || character == '_'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn substitutes_timestamp_token() {
        assert_eq!(render_template("evt_{ts}", "20260101120000", &Map::new()), "evt_20260101120000");
    }

    #[test]
    fn substitutes_named_arguments() {
        let input = args(json!({ "title": "Standup", "count": 3 }));
        assert_eq!(render_template("{title} x{count} @ {ts}", "1", &input), "Standup x3 @ 1");
    }

    #[test]
    fn unresolved_placeholder_falls_back_to_timestamp_only() {
        let input = args(json!({ "title": "Standup" }));
        assert_eq!(render_template("{title}-{missing}-{ts}", "99", &input), "{title}-{missing}-99");
    }

    #[test]
    fn escaped_braces_render_literally() {
        assert_eq!(render_template("{{raw}} {ts}", "7", &Map::new()), "{raw} 7");
    }

    #[test]
    fn malformed_templates_never_fail() {
        assert_eq!(render_template("open {ts", "7", &Map::new()), "open {ts");
        assert_eq!(render_template("{} {ts}", "7", &Map::new()), "{} 7");
        assert_eq!(render_template("{ts:>4} {ts}", "7", &Map::new()), "{ts:>4} 7");
        assert_eq!(render_template("stray } {ts}", "7", &Map::new()), "stray } 7");
    }
}
