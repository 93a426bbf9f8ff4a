//! Improvement-list and patch-plan sanitizing.

use serde_json::Value;

use super::entities::unescape_html_entities;
use crate::types::{PatchOperation, PatchOperationType};

/// Maximum number of improvements and patch operations kept.
const MAX_SUGGESTIONS: usize = 3;

/// Normalize the `improvements` field into at most three non-empty strings.
pub(crate) fn normalize_improvements(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(stringify)
            .filter(|s| !s.is_empty())
            .take(MAX_SUGGESTIONS)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Normalize the `patchPlan` field into at most three valid operations,
/// preserving input order.
pub(crate) fn normalize_patch_plan(value: Option<&Value>) -> Vec<PatchOperation> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(normalize_patch_operation)
        .take(MAX_SUGGESTIONS)
        .collect()
}

fn normalize_patch_operation(value: &Value) -> Option<PatchOperation> {
    let entry = value.as_object()?;

    let op = match entry.get("op").and_then(Value::as_str) {
        Some("insert") => PatchOperationType::Insert,
        Some("delete") => PatchOperationType::Delete,
        // Invalid or missing op falls back to replace.
        _ => PatchOperationType::Replace,
    };

    let old_text = unescape_html_entities(&text_field(entry.get("oldText")));
    // An edit anchored to nothing is meaningless.
    if old_text.is_empty() {
        return None;
    }

    let new_text = unescape_html_entities(&text_field(entry.get("newText")));
    let instruction = text_field(entry.get("instruction"));

    let occurrence = entry
        .get("occurrence")
        .and_then(Value::as_f64)
        .map(f64::trunc)
        .filter(|n| *n >= 1.0)
        .map(|n| n.min(f64::from(u32::MAX)) as u32);

    Some(PatchOperation {
        op,
        old_text,
        new_text,
        instruction,
        occurrence,
    })
}

fn text_field(value: Option<&Value>) -> String {
    value.and_then(stringify).unwrap_or_default()
}

/// Render a JSON value as a plain string: strings as-is, scalars via
/// display, compound values as compact JSON, null as nothing.
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        compound => serde_json::to_string(compound).ok(),
    }
}
