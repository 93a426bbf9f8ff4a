//! Score normalization.
//!
//! The located payload's `score` field arrives in many shapes: a bare number,
//! a numeric string, an object with `overall` and `dimensions`, an object map
//! of dimensions, or dimension scores flattened directly into the score
//! object. Each rule is individually failure-tolerant; a response is only
//! rejected when no valid overall score can be produced at all.

use serde_json::Value;

use crate::error::EvalError;
use crate::types::{EvaluationDimension, EvaluationScore};

/// Label used for the synthetic dimension when the model only returns an
/// overall score.
pub(crate) const OVERALL_DIMENSION_LABEL: &str = "综合评分";

/// Dimension keys some models flatten directly into the `score` object.
const FLATTENED_DIMENSION_KEYS: [&str; 4] = [
    "goalAchievement",
    "outputQuality",
    "formatCompliance",
    "relevance",
];

/// Normalize the payload's `score` field into a canonical score.
pub(crate) fn normalize_score(payload: &Value) -> Result<EvaluationScore, EvalError> {
    let map = payload.as_object().ok_or_else(|| {
        EvalError::Parse("evaluation result is not an object".to_string())
    })?;

    let score_raw = match map.get("score") {
        None | Some(Value::Null) => {
            return Err(EvalError::Parse(
                "evaluation result is missing the \"score\" field".to_string(),
            ))
        }
        Some(value) => value,
    };

    let mut overall: Option<u8> = None;
    let mut dimensions: Vec<EvaluationDimension> = Vec::new();

    match score_raw {
        Value::Number(_) | Value::String(_) => {
            overall = coerce_score(score_raw);
        }
        Value::Object(score_map) => {
            overall = score_map.get("overall").and_then(coerce_score);

            match score_map.get("dimensions") {
                Some(Value::Array(items)) => dimensions = dimensions_from_array(items),
                Some(Value::Object(entries)) => dimensions = dimensions_from_object(entries),
                _ => {
                    for key in FLATTENED_DIMENSION_KEYS {
                        if let Some(value) = score_map.get(key) {
                            if let Some(dim) = to_dimension(key, key, Some(value)) {
                                dimensions.push(dim);
                            }
                        }
                    }
                }
            }
        }
        _ => {}
    }

    if overall.is_none() && !dimensions.is_empty() {
        let sum: f64 = dimensions.iter().map(|d| f64::from(d.score)).sum();
        let mean = sum / dimensions.len() as f64;
        overall = Some(mean.round().clamp(0.0, 100.0) as u8);
    }

    if dimensions.is_empty() {
        if let Some(score) = overall {
            dimensions.push(EvaluationDimension {
                key: "overall".to_string(),
                label: OVERALL_DIMENSION_LABEL.to_string(),
                score,
            });
        }
    }

    let overall = overall.ok_or_else(|| {
        EvalError::Parse("evaluation result is missing a valid overall score".to_string())
    })?;

    Ok(EvaluationScore {
        overall,
        dimensions,
    })
}

/// Coerce a JSON value into a score in `[0, 100]`, rounding to an integer.
///
/// Numeric strings use leading-integer semantics, so `"85/100"` coerces
/// to 85. Anything non-coercible yields `None`.
pub(crate) fn coerce_score(value: &Value) -> Option<u8> {
    let num = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_leading_int(s)? as f64,
        _ => return None,
    };
    if !num.is_finite() {
        return None;
    }
    Some(num.clamp(0.0, 100.0).round() as u8)
}

/// Leading-integer parse: optional sign, then digits, everything after is
/// ignored. `None` when no digits are found.
fn parse_leading_int(s: &str) -> Option<i64> {
    let t = s.trim_start();
    let (negative, rest) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t.strip_prefix('+').unwrap_or(t)),
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let significant = digits.trim_start_matches('0');
    let magnitude: i64 = if significant.len() > 3 {
        i64::MAX
    } else if significant.is_empty() {
        0
    } else {
        significant.parse().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}

fn dimensions_from_array(items: &[Value]) -> Vec<EvaluationDimension> {
    let mut out = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Object(entry) => {
                let key = string_field(entry, "key")
                    .or_else(|| string_field(entry, "name"))
                    .filter(|k| !k.is_empty());
                let Some(key) = key else { continue };
                let label = string_field(entry, "label")
                    .or_else(|| string_field(entry, "title"))
                    .unwrap_or_else(|| key.clone());
                let score_value = non_null(entry.get("score")).or_else(|| non_null(entry.get("value")));
                if let Some(dim) = to_dimension(&key, &label, score_value) {
                    out.push(dim);
                }
            }
            Value::Number(_) | Value::String(_) => {
                let placeholder = format!("dim{}", index + 1);
                if let Some(dim) = to_dimension(&placeholder, &placeholder, Some(item)) {
                    out.push(dim);
                }
            }
            _ => {}
        }
    }
    out
}

fn dimensions_from_object(entries: &serde_json::Map<String, Value>) -> Vec<EvaluationDimension> {
    let mut out = Vec::new();
    for (key, value) in entries {
        let dim = match value {
            Value::Object(inner) => {
                let label = string_field(inner, "label").unwrap_or_else(|| key.clone());
                let score_value =
                    non_null(inner.get("score")).or_else(|| non_null(inner.get("value")));
                to_dimension(key, &label, score_value)
            }
            _ => to_dimension(key, key, Some(value)),
        };
        if let Some(dim) = dim {
            out.push(dim);
        }
    }
    out
}

fn to_dimension(key: &str, label: &str, score_value: Option<&Value>) -> Option<EvaluationDimension> {
    let score = coerce_score(score_value?)?;
    Some(EvaluationDimension {
        key: key.to_string(),
        label: if label.is_empty() { key } else { label }.to_string(),
        score,
    })
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

#[cfg(test)]
#[path = "score_tests.rs"]
mod tests;
