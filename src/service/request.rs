use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::types::EvaluationType;

/// Function mode and sub mode selecting an evaluation template family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationModeConfig {
    pub function_mode: String,
    pub sub_mode: String,
}

/// A request to evaluate a prompt or its test output.
///
/// Which optional fields are required depends on the evaluation type; see
/// [`EvaluationRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    #[serde(rename = "type")]
    pub eval_type: EvaluationType,
    pub evaluation_model_key: String,
    pub mode: EvaluationModeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_test_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_test_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterate_requirement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_prompt: Option<String>,
    /// Caller-supplied template variables, merged into the context
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

impl EvaluationRequest {
    /// Check that every field the evaluation type needs is present and
    /// non-blank.
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.evaluation_model_key.trim().is_empty() {
            return Err(EvalError::InvalidRequest(
                "evaluation model key must not be empty".to_string(),
            ));
        }
        if self.mode.function_mode.trim().is_empty() {
            return Err(EvalError::InvalidRequest(
                "function mode must not be empty".to_string(),
            ));
        }
        if self.mode.sub_mode.trim().is_empty() {
            return Err(EvalError::InvalidRequest(
                "sub mode must not be empty".to_string(),
            ));
        }

        match self.eval_type {
            EvaluationType::Original => {
                require(&self.test_result, "test result")?;
            }
            EvaluationType::Optimized => {
                require(&self.optimized_prompt, "optimized prompt")?;
                require(&self.test_result, "test result")?;
            }
            EvaluationType::Compare => {
                require(&self.optimized_prompt, "optimized prompt")?;
                require(&self.original_test_result, "original test result")?;
                require(&self.optimized_test_result, "optimized test result")?;
            }
            EvaluationType::PromptOnly => {
                require(&self.optimized_prompt, "optimized prompt")?;
            }
            EvaluationType::PromptIterate => {
                require(&self.optimized_prompt, "optimized prompt")?;
                require(&self.iterate_requirement, "iteration requirement")?;
            }
        }
        Ok(())
    }

    /// Template id for this request:
    /// `evaluation-{function_mode}-{sub_mode}-{type}`.
    pub fn template_id(&self) -> String {
        format!(
            "evaluation-{}-{}-{}",
            self.mode.function_mode, self.mode.sub_mode, self.eval_type
        )
    }
}

fn require(field: &Option<String>, name: &str) -> Result<(), EvalError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(EvalError::InvalidRequest(format!(
            "{name} must not be empty"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn base_request(eval_type: EvaluationType) -> EvaluationRequest {
        EvaluationRequest {
            eval_type,
            evaluation_model_key: "judge-model".to_string(),
            mode: EvaluationModeConfig {
                function_mode: "basic".to_string(),
                sub_mode: "system".to_string(),
            },
            test_result: None,
            optimized_prompt: None,
            original_test_result: None,
            optimized_test_result: None,
            iterate_requirement: None,
            test_content: None,
            user_feedback: None,
            original_prompt: None,
            variables: BTreeMap::new(),
        }
    }

    #[test]
    fn template_id_combines_mode_and_type() {
        let request = base_request(EvaluationType::PromptIterate);
        assert_eq!(request.template_id(), "evaluation-basic-system-prompt-iterate");
    }

    #[test]
    fn blank_model_key_is_rejected() {
        let mut request = base_request(EvaluationType::PromptOnly);
        request.optimized_prompt = Some("p".to_string());
        request.evaluation_model_key = "  ".to_string();
        let err = request.validate().unwrap_err();
        assert_eq!(err.code(), "error.evaluation.validation");
    }

    #[test]
    fn blank_mode_parts_are_rejected() {
        let mut request = base_request(EvaluationType::PromptOnly);
        request.optimized_prompt = Some("p".to_string());
        request.mode.sub_mode = String::new();
        assert!(request.validate().is_err());
    }

    #[rstest]
    #[case(EvaluationType::Original)]
    #[case(EvaluationType::Optimized)]
    #[case(EvaluationType::Compare)]
    #[case(EvaluationType::PromptOnly)]
    #[case(EvaluationType::PromptIterate)]
    fn missing_required_fields_are_rejected(#[case] eval_type: EvaluationType) {
        assert!(base_request(eval_type).validate().is_err());
    }

    #[test]
    fn complete_requests_validate() {
        let mut request = base_request(EvaluationType::Original);
        request.test_result = Some("output".to_string());
        assert!(request.validate().is_ok());

        let mut request = base_request(EvaluationType::Compare);
        request.optimized_prompt = Some("p".to_string());
        request.original_test_result = Some("a".to_string());
        request.optimized_test_result = Some("b".to_string());
        assert!(request.validate().is_ok());

        let mut request = base_request(EvaluationType::PromptIterate);
        request.optimized_prompt = Some("p".to_string());
        request.iterate_requirement = Some("make it shorter".to_string());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn whitespace_only_required_field_is_rejected() {
        let mut request = base_request(EvaluationType::Original);
        request.test_result = Some("   ".to_string());
        assert!(request.validate().is_err());
    }
}
