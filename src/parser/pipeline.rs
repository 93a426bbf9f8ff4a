//! The parse pipeline: candidates → repair/parse → locate → normalize,
//! with the text fallback once every candidate is exhausted.

use serde_json::Value;

use crate::error::EvalError;
use crate::types::{EvaluationMetadata, EvaluationResponse, EvaluationType};

use super::candidates::extract_json_candidates;
use super::fallback::{exhausted_error, parse_text_fallback};
use super::locate::find_evaluation_payload;
use super::patch::{normalize_improvements, normalize_patch_plan};
use super::repair::repair_and_parse;
use super::score::normalize_score;

/// Parse raw model output into a normalized evaluation response.
///
/// Tries every JSON candidate in priority order; failures inside one
/// candidate never abort the others. Only when every candidate and the text
/// fallback have failed does this return an error, and that error reports
/// the input length rather than its content.
pub fn parse_evaluation_response(
    content: &str,
    eval_type: EvaluationType,
    metadata: EvaluationMetadata,
) -> Result<EvaluationResponse, EvalError> {
    for candidate in extract_json_candidates(content) {
        let parsed = match repair_and_parse(&candidate) {
            Ok(value) => value,
            Err(err) => {
                log::debug!("skipping JSON candidate that failed to parse: {err}");
                continue;
            }
        };

        let Some(payload) = find_evaluation_payload(&parsed) else {
            log::debug!("skipping JSON candidate with no evaluation payload");
            continue;
        };

        match normalize_payload(payload, eval_type, &metadata) {
            Ok(response) => return Ok(response),
            Err(err) => {
                log::warn!("skipping evaluation payload that failed to normalize: {err}");
                continue;
            }
        }
    }

    if let Some(response) = parse_text_fallback(content, eval_type, &metadata) {
        log::warn!("no JSON candidate survived, using text fallback parsing");
        return Ok(response);
    }

    Err(exhausted_error(content))
}

fn normalize_payload(
    payload: &Value,
    eval_type: EvaluationType,
    metadata: &EvaluationMetadata,
) -> Result<EvaluationResponse, EvalError> {
    let score = normalize_score(payload)?;

    let fields = payload.as_object();
    let improvements = normalize_improvements(fields.and_then(|m| m.get("improvements")));
    let patch_plan = normalize_patch_plan(fields.and_then(|m| m.get("patchPlan")));
    let summary = fields
        .and_then(|m| m.get("summary"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(EvaluationResponse {
        eval_type,
        score,
        improvements,
        summary,
        patch_plan,
        metadata: metadata.clone(),
    })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
