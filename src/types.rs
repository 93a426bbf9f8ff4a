use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of evaluation being performed.
///
/// Passed through to the final response unchanged; the parsing engine never
/// branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationType {
    /// Score the raw test output of the original prompt
    Original,
    /// Score the test output of the optimized prompt
    Optimized,
    /// Compare original and optimized test outputs
    Compare,
    /// Score a prompt on its own, without test output
    PromptOnly,
    /// Score a prompt against an iteration requirement
    PromptIterate,
}

impl EvaluationType {
    /// Kebab-case identifier used in template ids and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationType::Original => "original",
            EvaluationType::Optimized => "optimized",
            EvaluationType::Compare => "compare",
            EvaluationType::PromptOnly => "prompt-only",
            EvaluationType::PromptIterate => "prompt-iterate",
        }
    }
}

impl std::fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named scored axis of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationDimension {
    /// Machine-readable dimension key, e.g. `goalAchievement`
    pub key: String,
    /// Human-readable label; falls back to the key when the model omits it
    pub label: String,
    /// Dimension score in `[0, 100]`
    pub score: u8,
}

/// Normalized evaluation score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationScore {
    /// Overall score in `[0, 100]`
    pub overall: u8,
    /// Per-dimension scores; never empty in a normalized score
    pub dimensions: Vec<EvaluationDimension>,
}

/// Kind of suggested text edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOperationType {
    Insert,
    #[default]
    Replace,
    Delete,
}

/// A suggested edit against the prompt under evaluation, anchored by an
/// exact-match substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOperation {
    pub op: PatchOperationType,
    /// Anchor text; guaranteed non-empty after entity decoding
    pub old_text: String,
    pub new_text: String,
    /// Free-text instruction accompanying the edit
    pub instruction: String,
    /// 1-based occurrence of the anchor to edit, when the model specifies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<u32>,
}

/// Opaque passthrough metadata describing how the evaluation was produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetadata {
    /// Key of the model that produced the raw output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// When the evaluation completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Wall-clock duration of the model call in milliseconds
    #[serde(
        rename = "duration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_ms: Option<u64>,
}

/// Final, fully normalized evaluation result.
///
/// Built once per parse; either every field is internally consistent or the
/// parse fails with an error instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    #[serde(rename = "type")]
    pub eval_type: EvaluationType,
    pub score: EvaluationScore,
    /// Improvement suggestions, at most 3
    pub improvements: Vec<String>,
    pub summary: String,
    /// Suggested prompt edits, at most 3
    pub patch_plan: Vec<PatchOperation>,
    #[serde(default)]
    pub metadata: EvaluationMetadata,
}
