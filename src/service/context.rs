use std::collections::BTreeMap;

use serde_json::{json, Value};

use super::request::EvaluationRequest;
use crate::types::EvaluationType;

/// Variables handed to the template source when rendering.
pub type TemplateContext = BTreeMap<String, Value>;

/// Build the template context for a request.
///
/// Caller variables are merged in after the base fields, so they may
/// deliberately override them. Per-type fields are added last; validation
/// has already guaranteed they are present.
pub(crate) fn build_template_context(request: &EvaluationRequest) -> TemplateContext {
    let mut context = TemplateContext::new();

    context.insert(
        "testContent".to_string(),
        json!(request.test_content.clone().unwrap_or_default()),
    );
    for (key, value) in &request.variables {
        context.insert(key.clone(), json!(value));
    }

    let feedback = request
        .user_feedback
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    context.insert("hasUserFeedback".to_string(), json!(feedback.is_some()));
    if let Some(feedback) = feedback {
        context.insert("userFeedback".to_string(), json!(feedback));
    }

    match &request.original_prompt {
        Some(prompt) => {
            context.insert("originalPrompt".to_string(), json!(prompt));
            context.insert("hasOriginalPrompt".to_string(), json!(true));
        }
        None => {
            context.insert("hasOriginalPrompt".to_string(), json!(false));
        }
    }

    let field = |value: &Option<String>| json!(value.clone().unwrap_or_default());
    match request.eval_type {
        EvaluationType::Original => {
            context.insert("testResult".to_string(), field(&request.test_result));
        }
        EvaluationType::Optimized => {
            context.insert(
                "optimizedPrompt".to_string(),
                field(&request.optimized_prompt),
            );
            context.insert("testResult".to_string(), field(&request.test_result));
        }
        EvaluationType::Compare => {
            context.insert(
                "optimizedPrompt".to_string(),
                field(&request.optimized_prompt),
            );
            context.insert(
                "originalTestResult".to_string(),
                field(&request.original_test_result),
            );
            context.insert(
                "optimizedTestResult".to_string(),
                field(&request.optimized_test_result),
            );
        }
        EvaluationType::PromptOnly => {
            context.insert(
                "optimizedPrompt".to_string(),
                field(&request.optimized_prompt),
            );
        }
        EvaluationType::PromptIterate => {
            context.insert(
                "optimizedPrompt".to_string(),
                field(&request.optimized_prompt),
            );
            context.insert(
                "iterateRequirement".to_string(),
                field(&request.iterate_requirement),
            );
        }
    }

    context
}
