//! Answer extraction from untrusted `generateContent` response bodies.
//!
//! Two tiers, always in this order:
//! 1. Structural: parse the body and read `candidates[0].content.parts[0].text`.
//! 2. Pattern: scan the raw text for the first `"text": "..."` field and unescape it.
//!    This still works on truncated or otherwise invalid JSON.
//!
//! Whichever tier succeeds, the text is cut at the first trailing-metadata marker and
//! trimmed. Malformed input yields `None`, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::char::REPLACEMENT_CHARACTER;

/// Sibling-field markers that show the extracted text ran past its own field.
pub const TRAILING_MARKERS: &[&str] = &["\"role\"", "\"finishReason\"", "index:"];

const TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

// Quoted string tolerant of escaped quotes and backslashes; stops at the first unescaped quote.
static TEXT_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)"text"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("text field pattern is valid")
});

/// Which extraction tier produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    Structural,
    Pattern,
}

impl ExtractionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionSource::Structural => "structural",
            ExtractionSource::Pattern => "pattern",
        }
    }
}

pub struct ResponseExtractor;

impl ResponseExtractor {
    /// Recover the cleaned answer text, or `None` when the body holds none.
    pub fn extract(body: &str) -> Option<String> {
        Self::extract_with_source(body).map(|(text, _)| text)
    }

    pub fn extract_with_source(body: &str) -> Option<(String, ExtractionSource)> {
        let (raw, source) = match Self::structural(body) {
            Some(text) => (text, ExtractionSource::Structural),
            None => (Self::pattern(body)?, ExtractionSource::Pattern),
        };
        let cleaned = Self::strip_trailing_metadata(&raw);
        if cleaned.is_empty() {
            return None;
        }
        Some((cleaned.to_string(), source))
    }

    fn structural(body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body).ok()?;
        value
            .pointer(TEXT_POINTER)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    fn pattern(body: &str) -> Option<String> {
        let captures = TEXT_FIELD.captures(body)?;
        captures.get(1).map(|m| unescape(m.as_str()))
    }

    /// Cut `text` at the earliest trailing marker and trim the remainder.
    pub fn strip_trailing_metadata(text: &str) -> &str {
        let cut = TRAILING_MARKERS
            .iter()
            .filter_map(|marker| text.find(marker))
            .min()
            .unwrap_or(text.len());
        text[..cut].trim()
    }
}

fn hex4(s: &str) -> Option<u16> {
    let digits = s.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

/// Undo JSON string escapes. Unknown escapes keep the escaped character; a `\u`
/// without four hex digits keeps the literal `u`.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let mut chars = rest[pos + 1..].chars();
        let Some(escaped) = chars.next() else {
            rest = "";
            break;
        };
        rest = chars.as_str();

        match escaped {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'u' => match hex4(rest) {
                Some(unit) => {
                    rest = &rest[4..];
                    if (0xD800..0xDC00).contains(&unit) {
                        let low = rest
                            .strip_prefix("\\u")
                            .and_then(hex4)
                            .filter(|low| (0xDC00..0xE000).contains(low));
                        match low {
                            Some(low) => {
                                rest = &rest[6..];
                                let cp = 0x10000
                                    + ((u32::from(unit) - 0xD800) << 10)
                                    + (u32::from(low) - 0xDC00);
                                out.push(char::from_u32(cp).unwrap_or(REPLACEMENT_CHARACTER));
                            }
                            None => out.push(REPLACEMENT_CHARACTER),
                        }
                    } else {
                        out.push(char::from_u32(u32::from(unit)).unwrap_or(REPLACEMENT_CHARACTER));
                    }
                }
                None => out.push('u'),
            },
            other => out.push(other),
        }
    }

    out.push_str(rest);
    out
}
