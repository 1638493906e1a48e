use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{paths::Location, types::JsonType};

/// Maximum preview length, in characters.
const PREVIEW_LIMIT: usize = 50;

/// One field of a structure report: where it is, what shape it holds, and
/// a short preview of its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    pub path: Location,
    pub kind: JsonType,
    pub preview: String,
}

impl fmt::Display for FieldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {}", self.path, self.kind, self.preview)
    }
}

/// Summarize the shape of a single object: every top-level field in key
/// order, then the fields of an `author` object and of the first `items`
/// element when those are present.
///
/// This is a flat projection for eyeballing a payload, not a recursive
/// walk; nested values show up only through their previews. Non-object
/// input produces an empty report.
#[must_use]
pub fn describe(value: &Value) -> Vec<FieldSummary> {
    let Some(map) = value.as_object() else {
        return Vec::new();
    };
    let mut fields = Vec::new();
    let root = Location::new();
    summarize_level(map, &root, &mut fields);
    if let Some(Value::Object(author)) = map.get("author") {
        summarize_level(author, &root.join("author"), &mut fields);
    }
    if let Some(Value::Array(items)) = map.get("items") {
        if let Some(Value::Object(first)) = items.first() {
            summarize_level(first, &root.join("items").join(0), &mut fields);
        }
    }
    fields
}

fn summarize_level(map: &Map<String, Value>, at: &Location, out: &mut Vec<FieldSummary>) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort_unstable();
    for key in keys {
        if let Some(value) = map.get(key) {
            out.push(FieldSummary {
                path: at.join(key),
                kind: JsonType::of(value),
                preview: preview(value),
            });
        }
    }
}

/// Stringify a value and cut it down to [`PREVIEW_LIMIT`] characters, with
/// an `...` suffix when longer. Strings preview as their bare content;
/// containers render JSON-style with `", "` separators.
fn preview(value: &Value) -> String {
    let rendered = match value {
        Value::String(string) => string.clone(),
        other => ValuePreview(other).to_string(),
    };
    if rendered.chars().count() <= PREVIEW_LIMIT {
        return rendered;
    }
    let cut: String = rendered.chars().take(PREVIEW_LIMIT).collect();
    format!("{cut}...")
}

struct ValuePreview<'a>(&'a Value);

impl fmt::Display for ValuePreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self.0)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(inner) => write!(f, "{inner}"),
        Value::Number(inner) => write!(f, "{inner}"),
        Value::String(inner) => write!(f, "\"{inner}\""),
        Value::Array(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item)?;
            }
            f.write_str("]")
        }
        Value::Object(map) => {
            f.write_str("{")?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "\"{key}\": ")?;
                write_value(f, item)?;
            }
            f.write_str("}")
        }
    }
}
