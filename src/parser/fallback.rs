//! Regex-based last resort when no JSON candidate survives.
//!
//! Patterns are tried in order; the first whose first match yields a score
//! in range wins. Chinese phrasings come before the English ones because the
//! templates ask for Chinese output by default.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::EvalError;
use crate::types::{
    EvaluationDimension, EvaluationMetadata, EvaluationResponse, EvaluationScore, EvaluationType,
};

use super::score::OVERALL_DIMENSION_LABEL;

/// Canned summary marking a response recovered through the fallback path.
const FALLBACK_SUMMARY: &str = "评估完成（解析降级）";

fn score_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // Leftover JSON fragments
            r#"(?i)["']overall["']\s*[:=]\s*([0-9]{1,3})"#,
            // Chinese phrasings
            r"综合评分\s*[:：]?\s*([0-9]{1,3})(?:\s*/\s*100)?",
            r"总[分评]\s*[:：]?\s*([0-9]{1,3})(?:\s*/\s*100)?",
            r"评分\s*[:：]?\s*([0-9]{1,3})(?:\s*/\s*100)?",
            // English phrasings
            r"(?i)overall(?:\s+score)?\s*[:：]?\s*([0-9]{1,3})(?:\s*/\s*100)?",
            r"(?i)score\s*[:：]?\s*([0-9]{1,3})(?:\s*/\s*100)?",
            // Bare "N/100" and "N分"
            r"([0-9]{1,3})\s*/\s*100",
            r"([0-9]{1,3})\s*[分点](?:\s*[（(]满分100[)）])?",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid fallback score pattern"))
        .collect()
    })
}

/// Scan raw text for a recognizable overall score and synthesize a minimal
/// response around it. Returns `None` when no pattern matches in range.
pub(crate) fn parse_text_fallback(
    content: &str,
    eval_type: EvaluationType,
    metadata: &EvaluationMetadata,
) -> Option<EvaluationResponse> {
    let overall = find_overall_score(content)?;

    Some(EvaluationResponse {
        eval_type,
        score: EvaluationScore {
            overall,
            dimensions: vec![EvaluationDimension {
                key: "overall".to_string(),
                label: OVERALL_DIMENSION_LABEL.to_string(),
                score: overall,
            }],
        },
        improvements: Vec::new(),
        summary: FALLBACK_SUMMARY.to_string(),
        patch_plan: Vec::new(),
        metadata: metadata.clone(),
    })
}

fn find_overall_score(content: &str) -> Option<u8> {
    for pattern in score_patterns() {
        if let Some(caps) = pattern.captures(content) {
            if let Ok(num) = caps[1].parse::<u16>() {
                if num <= 100 {
                    return Some(num as u8);
                }
            }
        }
    }
    None
}

/// Terminal error once every strategy is exhausted. Reports only the input
/// length so arbitrary model output never ends up in an error message.
pub(crate) fn exhausted_error(content: &str) -> EvalError {
    EvalError::Parse(format!(
        "no valid score JSON or recognizable overall score found ({} characters of model output)",
        content.chars().count()
    ))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{find_overall_score, parse_text_fallback, FALLBACK_SUMMARY};
    use crate::types::{EvaluationMetadata, EvaluationType};

    #[rstest]
    #[case("\"overall\": 87", Some(87))]
    #[case("'overall' = 91", Some(91))]
    #[case("综合评分：76/100", Some(76))]
    #[case("综合评分 88", Some(88))]
    #[case("总分: 70", Some(70))]
    #[case("总评：65/100", Some(65))]
    #[case("评分: 82", Some(82))]
    #[case("Overall score: 79", Some(79))]
    #[case("overall 93", Some(93))]
    #[case("Score: 58/100", Some(58))]
    #[case("I'd give it 66/100 overall-ish", Some(66))]
    #[case("大约85分（满分100）", Some(85))]
    #[case("90点", Some(90))]
    #[case("no score anywhere", None)]
    #[case("", None)]
    fn pattern_cases(#[case] content: &str, #[case] expected: Option<u8>) {
        assert_eq!(find_overall_score(content), expected);
    }

    #[test]
    fn out_of_range_match_falls_through_to_later_patterns() {
        // "overall": 150 is out of range; the bare N/100 pattern still
        // recovers the real score.
        assert_eq!(find_overall_score("\"overall\": 150, about 88/100"), Some(88));
        assert_eq!(find_overall_score("\"overall\": 150"), None);
    }

    #[test]
    fn fallback_synthesizes_a_minimal_response() {
        let response = parse_text_fallback(
            "综合评分：76/100",
            EvaluationType::Optimized,
            &EvaluationMetadata::default(),
        )
        .unwrap();
        assert_eq!(response.score.overall, 76);
        assert_eq!(response.score.dimensions.len(), 1);
        assert_eq!(response.score.dimensions[0].score, 76);
        assert_eq!(response.summary, FALLBACK_SUMMARY);
        assert!(response.improvements.is_empty());
        assert!(response.patch_plan.is_empty());
        assert_eq!(response.eval_type, EvaluationType::Optimized);
    }

    #[test]
    fn unmatchable_text_yields_none() {
        assert!(parse_text_fallback(
            "nothing quantitative here",
            EvaluationType::Original,
            &EvaluationMetadata::default(),
        )
        .is_none());
    }
}
