//! JSON candidate extraction from raw model output.
//!
//! Models wrap their JSON in fenced code blocks, bury it in prose, or emit it
//! bare. Extraction collects every plausible substring in priority order;
//! downstream stages decide which one actually parses.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Candidates longer than this are discarded outright.
const MAX_CANDIDATE_CHARS: usize = 200_000;

fn fenced_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```[a-zA-Z0-9_-]*\s*(.*?)```").expect("valid fenced block pattern")
    })
}

fn score_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"["']score["']\s*:"#).expect("valid score key pattern"))
}

/// Extract an ordered, deduplicated list of JSON candidates from `content`.
///
/// Most-likely-correct first. Never fails; returns at least one candidate
/// unless `content` is blank.
pub(crate) fn extract_json_candidates(content: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    // Fenced code blocks of any declared language, kept only when the block
    // plausibly holds JSON.
    for caps in fenced_block_re().captures_iter(content) {
        let block = caps[1].trim();
        if block.is_empty() {
            continue;
        }
        let head: String = block.chars().take(200).collect();
        if block.starts_with('{') || block.starts_with('[') || score_key_re().is_match(&head) {
            candidates.push(block.to_string());
        }
    }

    // Balanced spans anchored near a `"score":` occurrence.
    if let Some(m) = score_key_re().find(content) {
        if let Some(span) = balanced_span_before(content, m.start(), '{', '}') {
            candidates.push(span.to_string());
        }
        if let Some(span) = balanced_span_before(content, m.start(), '[', ']') {
            candidates.push(span.to_string());
        }
    }

    // Balanced spans from the first raw bracket of each kind.
    if let Some(start) = content.find('{') {
        if let Some(span) = balanced_span_from(content, start, '{', '}') {
            candidates.push(span.to_string());
        }
    }
    if let Some(start) = content.find('[') {
        if let Some(span) = balanced_span_from(content, start, '[', ']') {
            candidates.push(span.to_string());
        }
    }

    // The full raw text as last resort; repair can sometimes save it.
    candidates.push(content.to_string());

    dedup_candidates(candidates)
}

fn dedup_candidates(candidates: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut uniq = Vec::new();
    for candidate in candidates {
        let trimmed = candidate.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_CANDIDATE_CHARS {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            uniq.push(trimmed.to_string());
        }
    }
    uniq
}

/// Balanced span whose opening bracket is the nearest `open` at or before
/// `around` (a byte offset on a char boundary).
fn balanced_span_before(
    content: &str,
    around: usize,
    open: char,
    close: char,
) -> Option<&str> {
    let start = content[..around].rfind(open)?;
    balanced_span_from(content, start, open, close)
}

/// Scan forward from `start` with a string-aware, escape-aware bracket-depth
/// counter; returns the span once depth returns to zero.
///
/// Three states: normal, in-string, escaped. Both quote kinds open strings,
/// and brackets inside strings never count.
fn balanced_span_from(content: &str, start: usize, open: char, close: char) -> Option<&str> {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut quote = '"';
    let mut escaped = false;

    for (offset, ch) in content[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
                continue;
            }
            if ch == '\\' {
                escaped = true;
                continue;
            }
            if ch == quote {
                in_string = false;
            }
            continue;
        }

        if ch == '"' || ch == '\'' {
            in_string = true;
            quote = ch;
            continue;
        }

        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(&content[start..start + offset + ch.len_utf8()]);
            }
        }
    }

    None
}

#[cfg(test)]
#[path = "candidates_tests.rs"]
mod tests;
