use proptest::prelude::*;

use super::extract_json_candidates;

#[test]
fn empty_input_yields_no_candidates() {
    assert!(extract_json_candidates("").is_empty());
    assert!(extract_json_candidates("   \n\t").is_empty());
}

#[test]
fn prose_without_json_falls_back_to_full_text() {
    let candidates = extract_json_candidates("the output looks fine to me");
    assert_eq!(candidates, vec!["the output looks fine to me".to_string()]);
}

#[test]
fn fenced_json_block_comes_first() {
    let content = "Here is my verdict:\n```json\n{\"score\": 90}\n```\nDone.";
    let candidates = extract_json_candidates(content);
    assert_eq!(candidates[0], "{\"score\": 90}");
}

#[test]
fn fenced_block_without_language_tag_is_extracted() {
    let content = "```\n[1, 2, 3]\n```";
    let candidates = extract_json_candidates(content);
    assert_eq!(candidates[0], "[1, 2, 3]");
}

#[test]
fn fenced_prose_block_is_skipped() {
    let content = "```\njust words\n```";
    let candidates = extract_json_candidates(content);
    assert!(!candidates.iter().any(|c| c == "just words"));
}

#[test]
fn fenced_block_with_score_key_but_no_leading_bracket_is_kept() {
    let content = "```\n\"score\": 77, \"summary\": \"ok\"\n```";
    let candidates = extract_json_candidates(content);
    assert!(candidates.iter().any(|c| c.starts_with("\"score\"")));
}

#[test]
fn balanced_span_is_cut_out_of_surrounding_prose() {
    let content = "As requested {\"score\": 85, \"summary\": \"good\"} and nothing else.";
    let candidates = extract_json_candidates(content);
    assert!(candidates
        .iter()
        .any(|c| c == "{\"score\": 85, \"summary\": \"good\"}"));
}

#[test]
fn brackets_inside_strings_do_not_affect_balance() {
    let content = "{\"score\": 70, \"summary\": \"uses } and { freely\"}";
    let candidates = extract_json_candidates(content);
    assert_eq!(candidates[0], content);
}

#[test]
fn escaped_quotes_inside_strings_are_handled() {
    let content = "{\"score\": 70, \"summary\": \"a \\\"quoted\\\" }brace\"}";
    let candidates = extract_json_candidates(content);
    assert_eq!(candidates[0], content);
}

#[test]
fn score_anchor_recovers_object_preceding_the_key() {
    let content = "noise [ unbalanced {\"outer\": {\"score\": 66}} trailing";
    let candidates = extract_json_candidates(content);
    assert!(candidates.iter().any(|c| c == "{\"score\": 66}"));
}

#[test]
fn unbalanced_input_still_yields_full_text_candidate() {
    let content = "{\"score\": 50";
    let candidates = extract_json_candidates(content);
    assert_eq!(candidates, vec!["{\"score\": 50".to_string()]);
}

#[test]
fn duplicate_candidates_are_removed_keeping_priority_order() {
    // The fenced block, the score-anchored span, and the first-brace span all
    // resolve to the same object.
    let content = "```json\n{\"score\": 44}\n```";
    let candidates = extract_json_candidates(content);
    let object_count = candidates.iter().filter(|c| *c == "{\"score\": 44}").count();
    assert_eq!(object_count, 1);
    assert_eq!(candidates[0], "{\"score\": 44}");
}

#[test]
fn multibyte_text_around_json_is_handled() {
    let content = "评估结果：{\"score\": 88, \"summary\": \"很好\"}，完毕。";
    let candidates = extract_json_candidates(content);
    assert!(candidates
        .iter()
        .any(|c| c == "{\"score\": 88, \"summary\": \"很好\"}"));
}

proptest! {
    #[test]
    fn extraction_never_panics(s in "\\PC*") {
        let candidates = extract_json_candidates(&s);
        if !s.trim().is_empty() {
            prop_assert!(!candidates.is_empty());
        }
        for candidate in &candidates {
            prop_assert!(!candidate.trim().is_empty());
        }
    }

    #[test]
    fn extraction_never_panics_on_bracket_noise(s in "[{}\\[\\]\"'\\\\a-z ]{0,200}") {
        let _ = extract_json_candidates(&s);
    }
}
