//! JSON extraction and repair for raw model output
//!
//! The generative model is asked for a bare JSON object but routinely wraps it
//! in prose or Markdown fences, swaps in typographic quotes, or stops mid-object
//! when it runs into its output token limit. This module recovers a parsed
//! `serde_json::Value` from such text:
//!
//! 1. strip fence markers and map delimiting curly quotes to ASCII
//! 2. locate the first `{`
//! 3. scan forward to the matching `}` (string-aware, tracks `[`/`]` too)
//! 4. if input ends first, cut back to the last complete value and close
//!    every container that is still open
//! 5. parse

use serde_json::Value;
use thiserror::Error;

/// Why a model reply could not be turned into a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("no JSON object found in model output")]
    NoJsonFound,

    #[error("model output was truncated and could not be repaired")]
    TruncatedJson,

    #[error("malformed JSON in model output: {message}")]
    MalformedJson { message: String },
}

/// A JSON object recovered from model output.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub value: Value,
    /// True when the object was cut off and closed by truncation repair
    pub repaired: bool,
}

/// Extract the first JSON object from raw model text, repairing truncation.
pub fn extract_json(raw: &str) -> Result<Extracted, NormalizeError> {
    let cleaned = clean_model_text(raw);
    let start = cleaned.find('{').ok_or(NormalizeError::NoJsonFound)?;
    let text = &cleaned[start..];

    match scan_object(text) {
        Scan::Complete(end) => {
            let value = serde_json::from_str::<Value>(&text[..end]).map_err(|e| {
                NormalizeError::MalformedJson {
                    message: e.to_string(),
                }
            })?;
            Ok(Extracted {
                value,
                repaired: false,
            })
        }
        Scan::Truncated(candidate) => {
            tracing::debug!(
                original_len = text.len(),
                repaired_len = candidate.len(),
                "Closing truncated model JSON"
            );
            let value = serde_json::from_str::<Value>(&candidate)
                .map_err(|_| NormalizeError::TruncatedJson)?;

            // Nothing survived the cut: the reply broke inside its first field
            match value.as_object() {
                Some(map) if !map.is_empty() => Ok(Extracted {
                    value,
                    repaired: true,
                }),
                _ => Err(NormalizeError::TruncatedJson),
            }
        }
    }
}

/// Remove Markdown fence markers and typographic quotes.
///
/// A fence is three backticks optionally followed by a language tag
/// (```` ```json ````). Curly quotes used as delimiters become ASCII; text
/// inside ASCII-quoted strings is left untouched.
pub fn clean_model_text(raw: &str) -> String {
    map_typographic_quotes(&strip_fences(raw)).trim().to_string()
}

fn strip_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];

        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        let tag_ends_line = rest[tag_len..]
            .chars()
            .next()
            .map_or(true, |c| c.is_whitespace());
        if tag_len > 0 && tag_ends_line {
            rest = &rest[tag_len..];
        }
    }
    out.push_str(rest);
    out
}

#[derive(Clone, Copy, PartialEq)]
enum Quoting {
    Outside,
    /// Opened by `"`; contents are copied verbatim
    Ascii,
    /// Opened by a curly quote; curly quotes inside are rewritten
    Curly,
}

/// Prose before the first `{` is mapped wholesale. From the brace on,
/// string state is tracked so quotes inside valid strings survive.
fn map_typographic_quotes(text: &str) -> String {
    let start = text.find('{').unwrap_or(text.len());
    let mut out = String::with_capacity(text.len());
    out.extend(text[..start].chars().map(ascii_quote));

    let mut state = Quoting::Outside;
    let mut escaped = false;
    for c in text[start..].chars() {
        if state != Quoting::Outside && escaped {
            escaped = false;
            out.push(c);
            continue;
        }
        match (state, c) {
            (Quoting::Ascii, '\\') | (Quoting::Curly, '\\') => {
                escaped = true;
                out.push(c);
            }
            (Quoting::Ascii, '"') => {
                state = Quoting::Outside;
                out.push(c);
            }
            (Quoting::Ascii, _) => out.push(c),
            (Quoting::Curly, '"' | '\u{201C}' | '\u{201D}') => {
                state = Quoting::Outside;
                out.push('"');
            }
            (Quoting::Curly, _) => out.push(ascii_quote(c)),
            (Quoting::Outside, '"') => {
                state = Quoting::Ascii;
                out.push(c);
            }
            (Quoting::Outside, '\u{201C}' | '\u{201D}') => {
                state = Quoting::Curly;
                out.push('"');
            }
            (Quoting::Outside, _) => out.push(ascii_quote(c)),
        }
    }
    out
}

fn ascii_quote(c: char) -> char {
    match c {
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2018}' | '\u{2019}' => '\'',
        other => other,
    }
}

// ============================================================================
// Brace balancing
// ============================================================================

enum Scan {
    /// Byte length of the balanced object
    Complete(usize),
    /// Closed-off prefix of a truncated object
    Truncated(String),
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    /// `awaiting_value` is set between `:` and the end of the member value
    Object { awaiting_value: bool },
    Array,
}

impl Frame {
    fn closer(self) -> char {
        match self {
            Frame::Object { .. } => '}',
            Frame::Array => ']',
        }
    }
}

/// Last prefix of the input that can be closed into valid JSON, and how
/// many containers were open there.
#[derive(Clone, Copy)]
struct Cut {
    end: usize,
    depth: usize,
}

impl Cut {
    fn at(end: usize, stack: &[Frame]) -> Self {
        Cut {
            end,
            depth: stack.len(),
        }
    }

    /// Every push and pop records a new cut, so the frames below `depth`
    /// are still the ones that were open at the cut.
    fn close(self, text: &str, stack: &[Frame]) -> String {
        let open = &stack[..self.depth.min(stack.len())];
        let mut repaired = String::with_capacity(self.end + open.len());
        repaired.push_str(text[..self.end].trim_end());
        repaired.extend(open.iter().rev().map(|f| f.closer()));
        repaired
    }
}

/// Mark the value inside the current container as finished.
fn finish_value(stack: &mut [Frame]) {
    if let Some(Frame::Object { awaiting_value }) = stack.last_mut() {
        *awaiting_value = false;
    }
}

/// A string closing here is an object key rather than a value.
fn string_is_key(stack: &[Frame]) -> bool {
    matches!(
        stack.last(),
        Some(Frame::Object {
            awaiting_value: false
        })
    )
}

/// Bytes that continue a bare token. Non-ASCII bytes count so a stray
/// multi-byte character is consumed whole and never split by a cut.
fn is_scalar_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'+' | b'.') || !b.is_ascii()
}

/// Scan from an opening `{` to its matching `}`.
///
/// Braces and brackets inside string literals are ignored. Structural bytes
/// are all ASCII, so walking bytes never splits a multi-byte character at a
/// recorded cut point.
fn scan_object(text: &str) -> Scan {
    let bytes = text.as_bytes();
    let mut stack: Vec<Frame> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut in_scalar = false;
    let mut scalar_start = 0;
    let mut cut = Cut::at(0, &stack);

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
                if !string_is_key(&stack) {
                    finish_value(&mut stack);
                    cut = Cut::at(i + 1, &stack);
                }
            }
            continue;
        }

        if in_scalar {
            if is_scalar_byte(b) {
                continue;
            }
            // Only a delimiter proves a number or literal is complete
            in_scalar = false;
            finish_value(&mut stack);
            cut = Cut::at(i, &stack);
        }

        match b {
            b'{' => {
                stack.push(Frame::Object {
                    awaiting_value: false,
                });
                cut = Cut::at(i + 1, &stack);
            }
            b'[' => {
                stack.push(Frame::Array);
                cut = Cut::at(i + 1, &stack);
            }
            b'}' | b']' => {
                stack.pop();
                if stack.is_empty() {
                    return Scan::Complete(i + 1);
                }
                finish_value(&mut stack);
                cut = Cut::at(i + 1, &stack);
            }
            b'"' => in_string = true,
            b':' => {
                if let Some(Frame::Object { awaiting_value }) = stack.last_mut() {
                    *awaiting_value = true;
                }
            }
            b',' => {}
            _ if b.is_ascii_whitespace() => {}
            _ => {
                in_scalar = true;
                scalar_start = i;
            }
        }
    }

    // A literal is complete even without a trailing delimiter; numbers are not
    if in_scalar && matches!(&bytes[scalar_start..], b"true" | b"false" | b"null") {
        finish_value(&mut stack);
        cut = Cut::at(text.len(), &stack);
    }

    Scan::Truncated(cut.close(text, &stack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_fences_and_prose() {
        let raw = "Here is the result:\n```json\n{\"x\":1}\n```\nThanks";
        let extracted = extract_json(raw).unwrap();
        assert_eq!(extracted.value, json!({"x": 1}));
        assert!(!extracted.repaired);
    }

    #[test]
    fn test_clean_keeps_text_after_bare_fence() {
        assert_eq!(clean_model_text("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(clean_model_text("```JSON {\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_curly_quotes_are_normalized() {
        let raw = "{\u{201C}plantName\u{201D}: \u{201C}Farmer\u{2019}s tomato\u{201D}}";
        let extracted = extract_json(raw).unwrap();
        assert_eq!(extracted.value, json!({"plantName": "Farmer's tomato"}));
    }

    #[test]
    fn test_curly_quotes_inside_ascii_string_are_kept() {
        let raw = "{\"plantName\":\"X\",\"note\":\"he said \u{201C}hi\u{201D}, it\u{2019}s fine\"}";
        let extracted = extract_json(raw).unwrap();
        assert!(!extracted.repaired);
        assert_eq!(
            extracted.value,
            json!({"plantName": "X", "note": "he said \u{201C}hi\u{201D}, it\u{2019}s fine"})
        );
    }

    #[test]
    fn test_curly_quoted_prose_before_object() {
        let raw = "Here\u{2019}s the \u{201C}result\u{201D}: {\u{201C}a\u{201D}: \"b \\\" \u{201C}c\u{201D}\"}";
        let extracted = extract_json(raw).unwrap();
        assert_eq!(extracted.value, json!({"a": "b \" \u{201C}c\u{201D}"}));
    }

    #[test]
    fn test_no_brace_is_no_json() {
        assert_eq!(extract_json("sorry, I cannot help"), Err(NormalizeError::NoJsonFound));
        assert_eq!(extract_json(""), Err(NormalizeError::NoJsonFound));
    }

    #[test]
    fn test_braces_inside_strings_do_not_count() {
        let raw = r#"{"note":"use {braces} and ] freely","n":2} trailing }"#;
        let extracted = extract_json(raw).unwrap();
        assert_eq!(extracted.value["note"], "use {braces} and ] freely");
        assert_eq!(extracted.value["n"], 2);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let raw = r#"{"quote":"he said \"hi\" {","ok":true}"#;
        let extracted = extract_json(raw).unwrap();
        assert_eq!(extracted.value["ok"], true);
    }

    #[test]
    fn test_truncated_partial_array_element_is_dropped() {
        let extracted = extract_json(r#"{"a":{"b":1,"c":[1,2"#).unwrap();
        assert!(extracted.repaired);
        assert_eq!(extracted.value, json!({"a": {"b": 1, "c": [1]}}));
    }

    #[test]
    fn test_truncated_inside_string_keeps_earlier_fields() {
        let raw = r#"{"plantName":"Tomato","diseases":[{"name":"Blight","description":"Dark le"#;
        let extracted = extract_json(raw).unwrap();
        assert_eq!(
            extracted.value,
            json!({"plantName": "Tomato", "diseases": [{"name": "Blight"}]})
        );
    }

    #[test]
    fn test_truncated_after_key_drops_dangling_key() {
        let raw = r#"{"plantName":"Tomato","isHealthy""#;
        let extracted = extract_json(raw).unwrap();
        assert_eq!(extracted.value, json!({"plantName": "Tomato"}));

        let raw = r#"{"plantName":"Tomato","isHealthy": "#;
        let extracted = extract_json(raw).unwrap();
        assert_eq!(extracted.value, json!({"plantName": "Tomato"}));
    }

    #[test]
    fn test_truncated_after_comma_and_open_containers() {
        let raw = r#"{"a":1, "b":[ {"#;
        let extracted = extract_json(raw).unwrap();
        assert_eq!(extracted.value, json!({"a": 1, "b": [{}]}));
    }

    #[test]
    fn test_truncated_trailing_literal_is_kept_but_number_is_not() {
        let extracted = extract_json(r#"{"plantName":"Tomato","isHealthy":false"#).unwrap();
        assert_eq!(extracted.value, json!({"plantName": "Tomato", "isHealthy": false}));

        let extracted = extract_json(r#"{"plantName":"Tomato","confidence":8"#).unwrap();
        assert_eq!(extracted.value, json!({"plantName": "Tomato"}));

        let extracted = extract_json(r#"{"plantName":"Tomato","isHealthy":fal"#).unwrap();
        assert_eq!(extracted.value, json!({"plantName": "Tomato"}));
    }

    #[test]
    fn test_truncated_deep_nesting_closes_every_level() {
        let extracted = extract_json(r#"{"a":[{"b":[{"c":true,"d":"#).unwrap();
        assert_eq!(extracted.value, json!({"a": [{"b": [{"c": true}]}]}));
    }

    #[test]
    fn test_truncated_before_first_field_is_unrecoverable() {
        assert_eq!(extract_json(r#"{"plantName":"Tom"#), Err(NormalizeError::TruncatedJson));
        assert_eq!(extract_json("{"), Err(NormalizeError::TruncatedJson));
    }

    #[test]
    fn test_unescaped_control_character_is_malformed() {
        let raw = "{\"a\":\"line\nbreak\"}";
        assert!(matches!(
            extract_json(raw),
            Err(NormalizeError::MalformedJson { .. })
        ));
    }

    #[test]
    fn test_unquoted_keys_are_malformed() {
        assert!(matches!(
            extract_json("{plantName: 'Tomato'}"),
            Err(NormalizeError::MalformedJson { .. })
        ));
    }

    #[test]
    fn test_bare_non_ascii_token_does_not_split_characters() {
        // The bare token makes the closed prefix invalid; it must fail cleanly
        let raw = "{\"a\":1,\"b\":टमाटर,\"c\":[1";
        assert_eq!(extract_json(raw), Err(NormalizeError::TruncatedJson));
    }

    #[test]
    fn test_multibyte_text_survives_repair() {
        let raw = "{\"name\":\"टमाटर\",\"notes\":[\"पत्ती\",\"फ";
        let extracted = extract_json(raw).unwrap();
        assert_eq!(extracted.value, json!({"name": "टमाटर", "notes": ["पत्ती"]}));
    }
}
