//! Best-effort JSON auto-repair.
//!
//! Model output is close to JSON more often than it is JSON: trailing commas,
//! unquoted keys, smart quotes, single-quoted strings, Python literals,
//! truncated tails. The repair pass is a single string-aware sweep that fixes
//! what it recognizes and leaves the rest to the strict parser. A candidate
//! that still fails after repair is simply skipped by the caller.

use serde_json::Value;

/// Parse `candidate` as JSON, strictly first, then once more after repair.
pub(crate) fn repair_and_parse(candidate: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(_) => serde_json::from_str(&repair_json(candidate)),
    }
}

fn repair_json(input: &str) -> String {
    let cs: Vec<char> = input.trim().chars().collect();
    let mut out = String::with_capacity(input.len() + 8);
    let mut stack: Vec<char> = Vec::new();
    let mut i = 0;

    while i < cs.len() {
        let c = cs[i];
        match c {
            '"' | '\u{201C}' => {
                i = copy_double_quoted(&cs, i, &mut out);
            }
            '\'' | '\u{2018}' => {
                i = copy_single_quoted(&cs, i, &mut out);
            }
            '{' | '[' => {
                stack.push(c);
                out.push(c);
                i += 1;
            }
            '}' | ']' => {
                trim_trailing_comma(&mut out);
                stack.pop();
                out.push(c);
                i += 1;
            }
            '/' if cs.get(i + 1) == Some(&'/') => {
                while i < cs.len() && cs[i] != '\n' {
                    i += 1;
                }
            }
            '/' if cs.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < cs.len() && !(cs[i] == '*' && cs.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i = (i + 2).min(cs.len());
            }
            c if is_word_start(c) && !continues_number(&out) => {
                i = copy_bare_word(&cs, i, &mut out);
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    trim_trailing_comma(&mut out);
    while let Some(open) = stack.pop() {
        out.push(if open == '{' { '}' } else { ']' });
    }
    out
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// An alphabetic char directly after a digit belongs to a number literal
/// (`1e5`), not to a bare word.
fn continues_number(out: &str) -> bool {
    matches!(out.chars().last(), Some(last) if last.is_ascii_digit() || last == '.')
}

/// Copy a bare word, mapping known literals and quoting everything else.
fn copy_bare_word(cs: &[char], start: usize, out: &mut String) -> usize {
    let mut i = start;
    let mut word = String::new();
    while i < cs.len() && (cs[i].is_alphanumeric() || cs[i] == '_' || cs[i] == '$') {
        word.push(cs[i]);
        i += 1;
    }
    match word.as_str() {
        "true" | "false" | "null" => out.push_str(&word),
        "True" => out.push_str("true"),
        "False" => out.push_str("false"),
        "None" | "undefined" | "NaN" | "Infinity" => out.push_str("null"),
        _ => {
            out.push('"');
            out.push_str(&word);
            out.push('"');
        }
    }
    i
}

/// Copy a double-quoted (or smart-quoted) string, escaping raw control
/// characters and closing it if the input ends mid-string.
fn copy_double_quoted(cs: &[char], start: usize, out: &mut String) -> usize {
    let open = cs[start];
    out.push('"');
    let mut i = start + 1;
    while i < cs.len() {
        let c = cs[i];
        if c == '\\' {
            if i + 1 < cs.len() {
                out.push('\\');
                out.push(cs[i + 1]);
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }
        let closes = if open == '"' {
            c == '"'
        } else {
            c == '\u{201D}' || c == '"'
        };
        if closes {
            out.push('"');
            return i + 1;
        }
        push_string_char(out, c);
        i += 1;
    }
    out.push('"');
    cs.len()
}

/// Copy a single-quoted (or smart-quoted) string as a double-quoted one.
fn copy_single_quoted(cs: &[char], start: usize, out: &mut String) -> usize {
    let open = cs[start];
    out.push('"');
    let mut i = start + 1;
    while i < cs.len() {
        let c = cs[i];
        if c == '\\' {
            if i + 1 < cs.len() {
                let next = cs[i + 1];
                if next == '\'' {
                    out.push('\'');
                } else {
                    out.push('\\');
                    out.push(next);
                }
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }
        let closes = if open == '\'' {
            c == '\''
        } else {
            c == '\u{2019}' || c == '\''
        };
        if closes {
            out.push('"');
            return i + 1;
        }
        if c == '"' {
            out.push_str("\\\"");
            i += 1;
            continue;
        }
        push_string_char(out, c);
        i += 1;
    }
    out.push('"');
    cs.len()
}

fn push_string_char(out: &mut String, c: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        _ => out.push(c),
    }
}

fn trim_trailing_comma(out: &mut String) {
    let significant = out.trim_end().len();
    if out[..significant].ends_with(',') {
        out.truncate(significant - 1);
    }
}

#[cfg(test)]
#[path = "repair_tests.rs"]
mod tests;
