//! Flattening of heterogeneous run output into plain strings.
//!
//! Run servers answer with whatever their framework produces: bare strings,
//! JSON objects carrying a `content` key, message parts, or whole messages.
//! [`normalize_output`] turns any mix of those into one string per item.

use std::fmt;

use serde_json::Value;

use crate::types::{Message, MessagePart};

/// One item of run output as received from a run server.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputItem {
    Text(String),
    Value(Value),
    Part(MessagePart),
    Message(Message),
}

impl From<String> for OutputItem {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for OutputItem {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for OutputItem {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<MessagePart> for OutputItem {
    fn from(part: MessagePart) -> Self {
        Self::Part(part)
    }
}

impl From<Message> for OutputItem {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

/// Fallback rendering: JSON values in compact form, messages as their text.
impl fmt::Display for OutputItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Value(value) => write!(f, "{value}"),
            Self::Part(part) => match &part.content {
                Some(content) => write!(f, "{content}"),
                None => f.write_str("null"),
            },
            Self::Message(message) => write!(f, "{message}"),
        }
    }
}

type Rule = fn(&OutputItem) -> Option<String>;

/// Extraction rules, tried in order. The first `Some` wins.
const RULES: &[Rule] = &[already_text, mapping_with_content, part_with_content];

fn already_text(item: &OutputItem) -> Option<String> {
    match item {
        OutputItem::Text(text) => Some(text.clone()),
        OutputItem::Value(Value::String(text)) => Some(text.clone()),
        _ => None,
    }
}

fn mapping_with_content(item: &OutputItem) -> Option<String> {
    match item {
        OutputItem::Value(Value::Object(map)) => map.get("content").map(stringify_content),
        _ => None,
    }
}

fn part_with_content(item: &OutputItem) -> Option<String> {
    match item {
        OutputItem::Part(part) => part
            .content
            .as_ref()
            .filter(|c| !c.is_null())
            .map(stringify_content),
        _ => None,
    }
}

/// Strings unquoted, everything else as compact JSON.
fn stringify_content(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Normalize one item. Total: every item yields a string.
pub fn normalize_item(item: &OutputItem) -> String {
    RULES
        .iter()
        .find_map(|rule| rule(item))
        .unwrap_or_else(|| item.to_string())
}

/// Normalize a possibly-absent output sequence, preserving length and order.
pub fn normalize_output(items: Option<Vec<OutputItem>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .iter()
        .map(normalize_item)
        .collect()
}
