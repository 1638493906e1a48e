use std::fmt;

use ahash::AHashSet;
use serde::Serialize;
use serde_json::Value;

use crate::{paths::Location, types::JsonType};

/// Timestamp-like fields that legitimately differ between captures.
const DEFAULT_IGNORED_KEYS: [&str; 4] = ["lastRefreshed", "lastUpdated", "published", "created"];

/// Free-text and identifier fields where only the type is enforced.
const DEFAULT_VALUE_EXEMPT_KEYS: [&str; 5] = ["guid", "id", "description", "content", "title"];

/// Options for a single comparison call.
#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    ignored_keys: AHashSet<String>,
    value_exempt_keys: AHashSet<String>,
}

impl ComparisonConfig {
    /// A config with no ignored and no value-exempt keys.
    #[must_use]
    pub fn empty() -> Self {
        ComparisonConfig {
            ignored_keys: AHashSet::new(),
            value_exempt_keys: AHashSet::new(),
        }
    }

    /// Never compare values under `key`, at any depth.
    #[must_use]
    pub fn ignore_key(mut self, key: impl Into<String>) -> Self {
        self.ignored_keys.insert(key.into());
        self
    }

    /// Require matching types under `key` but do not report value
    /// differences.
    #[must_use]
    pub fn exempt_key(mut self, key: impl Into<String>) -> Self {
        self.value_exempt_keys.insert(key.into());
        self
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        ComparisonConfig {
            ignored_keys: DEFAULT_IGNORED_KEYS.iter().map(|key| (*key).to_string()).collect(),
            value_exempt_keys: DEFAULT_VALUE_EXEMPT_KEYS
                .iter()
                .map(|key| (*key).to_string())
                .collect(),
        }
    }
}

/// What kind of discrepancy a [`Diff`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    KeyOnlyInLeft,
    KeyOnlyInRight,
    TypeMismatch,
    LengthMismatch,
    ValueMismatch,
}

impl DiffKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DiffKind::KeyOnlyInLeft => "keys only in left",
            DiffKind::KeyOnlyInRight => "keys only in right",
            DiffKind::TypeMismatch => "type mismatch",
            DiffKind::LengthMismatch => "array length mismatch",
            DiffKind::ValueMismatch => "value difference",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported discrepancy between two JSON values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    pub path: Location,
    pub kind: DiffKind,
    pub detail: String,
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.path, self.detail)
    }
}

/// Compare two payloads from the root.
///
/// See [`compare_at`] for the walk itself.
#[must_use]
pub fn compare(left: &Value, right: &Value, config: &ComparisonConfig) -> Vec<Diff> {
    compare_at(left, right, Location::new(), config)
}

/// Compare two payloads, reporting paths relative to `path`.
///
/// The walk recurses into objects and into the first element of parallel
/// arrays when both first elements are objects; remaining elements are
/// never compared. Per object level the output order is fixed: keys only
/// in the left side, keys only in the right side, then common keys in
/// lexicographic order, depth first. A non-object side contributes no
/// keys, so two non-object inputs produce nothing.
#[must_use]
pub fn compare_at(
    left: &Value,
    right: &Value,
    path: Location,
    config: &ComparisonConfig,
) -> Vec<Diff> {
    let mut diffs = Vec::new();
    compare_objects(left, right, &path, config, &mut diffs);
    diffs
}

fn compare_objects(
    left: &Value,
    right: &Value,
    path: &Location,
    config: &ComparisonConfig,
    out: &mut Vec<Diff>,
) {
    let left_keys: AHashSet<&str> = left
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();
    let right_keys: AHashSet<&str> = right
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut only_left: Vec<&str> = left_keys.difference(&right_keys).copied().collect();
    only_left.sort_unstable();
    if !only_left.is_empty() {
        out.push(Diff {
            path: path.clone(),
            kind: DiffKind::KeyOnlyInLeft,
            detail: format!("{only_left:?}"),
        });
    }
    let mut only_right: Vec<&str> = right_keys.difference(&left_keys).copied().collect();
    only_right.sort_unstable();
    if !only_right.is_empty() {
        out.push(Diff {
            path: path.clone(),
            kind: DiffKind::KeyOnlyInRight,
            detail: format!("{only_right:?}"),
        });
    }

    let (Some(left_map), Some(right_map)) = (left.as_object(), right.as_object()) else {
        return;
    };
    let mut common: Vec<&str> = left_keys.intersection(&right_keys).copied().collect();
    common.sort_unstable();

    for key in common {
        if config.ignored_keys.contains(key) {
            continue;
        }
        let (Some(left_value), Some(right_value)) = (left_map.get(key), right_map.get(key)) else {
            continue;
        };
        let child = path.join(key);
        let left_type = JsonType::of(left_value);
        let right_type = JsonType::of(right_value);
        if left_type != right_type {
            out.push(Diff {
                path: child,
                kind: DiffKind::TypeMismatch,
                detail: format!("{left_type} vs {right_type}"),
            });
            continue;
        }
        match (left_value, right_value) {
            (Value::Object(_), Value::Object(_)) => {
                compare_objects(left_value, right_value, &child, config, out);
            }
            (Value::Array(left_items), Value::Array(right_items)) => {
                if left_items.len() != right_items.len() {
                    out.push(Diff {
                        path: child.clone(),
                        kind: DiffKind::LengthMismatch,
                        detail: format!("{} vs {}", left_items.len(), right_items.len()),
                    });
                }
                // Arrays are schema samples: only the first elements are
                // walked, and only when both are objects.
                if let (Some(left_first @ Value::Object(_)), Some(right_first @ Value::Object(_))) =
                    (left_items.first(), right_items.first())
                {
                    compare_objects(left_first, right_first, &child.join(0), config, out);
                }
            }
            _ => {
                if left_value != right_value && !config.value_exempt_keys.contains(key) {
                    out.push(Diff {
                        path: child,
                        kind: DiffKind::ValueMismatch,
                        detail: format!(
                            "{} vs {}",
                            render_scalar(left_value),
                            render_scalar(right_value)
                        ),
                    });
                }
            }
        }
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(string) => format!("'{string}'"),
        other => other.to_string(),
    }
}
