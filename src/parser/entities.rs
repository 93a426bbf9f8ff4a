//! HTML entity unescaping for patch text.
//!
//! Models sometimes HTML-escape XML-ish tags when emitting JSON. Decoding
//! runs a fixed ordered sequence: the named entities first, then generic hex
//! entities, then generic decimal entities. The named pass must come first so
//! it cannot re-interpret characters produced by the numeric passes.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn hex_entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&#x([0-9a-fA-F]+);").expect("valid hex entity pattern"))
}

fn dec_entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&#([0-9]+);").expect("valid decimal entity pattern"))
}

/// Decode HTML entities in `text`.
///
/// Entities that do not name a valid code point are left as written.
pub(crate) fn unescape_html_entities(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let named = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&sol;", "/");

    let hex_decoded = hex_entity_re().replace_all(&named, |caps: &Captures| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    dec_entity_re()
        .replace_all(&hex_decoded, |caps: &Captures| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
