use proptest::prelude::*;
use serde_json::json;

use super::repair_and_parse;

#[test]
fn valid_json_parses_strictly() {
    let value = repair_and_parse("{\"score\": 90}").unwrap();
    assert_eq!(value, json!({"score": 90}));
}

#[test]
fn trailing_commas_are_removed() {
    let value = repair_and_parse("{\"score\": 90, \"improvements\": [\"a\", \"b\",],}").unwrap();
    assert_eq!(value, json!({"score": 90, "improvements": ["a", "b"]}));
}

#[test]
fn unquoted_keys_are_quoted() {
    let value = repair_and_parse("{score: 91, summary: \"ok\"}").unwrap();
    assert_eq!(value, json!({"score": 91, "summary": "ok"}));
}

#[test]
fn single_quoted_strings_become_double_quoted() {
    let value = repair_and_parse("{'score': 88, 'summary': 'it\\'s fine'}").unwrap();
    assert_eq!(value, json!({"score": 88, "summary": "it's fine"}));
}

#[test]
fn smart_quotes_are_normalized() {
    let value = repair_and_parse("{\u{201C}score\u{201D}: 73}").unwrap();
    assert_eq!(value, json!({"score": 73}));
}

#[test]
fn truncated_objects_are_closed() {
    let value = repair_and_parse("{\"score\": {\"overall\": 80").unwrap();
    assert_eq!(value, json!({"score": {"overall": 80}}));
}

#[test]
fn truncated_string_is_closed() {
    let value = repair_and_parse("{\"summary\": \"cut off").unwrap();
    assert_eq!(value, json!({"summary": "cut off"}));
}

#[test]
fn python_literals_are_mapped() {
    let value = repair_and_parse("{\"passed\": True, \"failed\": False, \"extra\": None}").unwrap();
    assert_eq!(value, json!({"passed": true, "failed": false, "extra": null}));
}

#[test]
fn line_comments_are_stripped() {
    let value = repair_and_parse("{\n  \"score\": 95 // looks good\n}").unwrap();
    assert_eq!(value, json!({"score": 95}));
}

#[test]
fn block_comments_are_stripped() {
    let value = repair_and_parse("{\"score\": /* out of 100 */ 61}").unwrap();
    assert_eq!(value, json!({"score": 61}));
}

#[test]
fn raw_newlines_inside_strings_are_escaped() {
    let value = repair_and_parse("{\"summary\": \"line1\nline2\"}").unwrap();
    assert_eq!(value, json!({"summary": "line1\nline2"}));
}

#[test]
fn exponent_numbers_survive_the_word_pass() {
    let value = repair_and_parse("{\"score\": 1e2,}").unwrap();
    assert_eq!(value, json!({"score": 100.0}));
}

#[test]
fn hopeless_input_still_fails() {
    assert!(repair_and_parse("this is not json at all: ???").is_err());
}

proptest! {
    #[test]
    fn repair_never_panics(s in "\\PC*") {
        let _ = repair_and_parse(&s);
    }

    #[test]
    fn repair_preserves_already_valid_objects(score in 0u32..1000, label in "[a-zA-Z ]{0,20}") {
        let original = json!({"score": score, "label": label});
        let text = serde_json::to_string(&original).unwrap();
        prop_assert_eq!(repair_and_parse(&text).unwrap(), original);
    }
}
