//! Scanning and decoding of quoted literals.
//!
//! The lexer uses [`scan_quoted`] to find where a string or char literal ends
//! and to report malformed escapes; the parser runs the same scan over the
//! token text to obtain the decoded segments.
//!
//! An escape is a backslash followed by one of:
//!
//! - a 2-3 digit decimal code point (`\65`)
//! - `x` and two or more hex digits (`\x41`)
//! - `u{` 1-6 hex digits `}` (`\u{1F600}`)
//! - any single character other than `x`, `u`, `U` (`\n`, `\"`, `\q`)

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::errors::ErrorImpl;

lazy_static! {
    static ref ESCAPE: Regex =
        Regex::new(r"^\\(?:[0-9]{2,3}|x[0-9a-fA-F]{2,}|u\{[0-9a-fA-F]{1,6}\}|[^xuU\n])").unwrap();
}

/// A piece of a decoded string or char literal.
#[derive(Debug, Clone, PartialEq)]
pub enum StringSegment {
    /// Literal text between escapes.
    Text(String),
    /// A well-formed escape sequence and the character it stands for.
    Escape { raw: String, value: char },
    /// A backslash sequence that matches no escape form.
    Invalid(String),
}

impl StringSegment {
    pub fn raw(&self) -> &str {
        match self {
            StringSegment::Text(text) => text,
            StringSegment::Escape { raw, .. } => raw,
            StringSegment::Invalid(raw) => raw,
        }
    }
}

/// Result of scanning one quoted literal.
#[derive(Debug, Clone)]
pub struct ScannedLiteral {
    /// Bytes consumed, including both quotes when terminated.
    pub len: usize,
    pub terminated: bool,
    pub segments: Vec<StringSegment>,
    /// Problems with their byte ranges relative to the opening quote.
    pub problems: Vec<(ErrorImpl, Range<usize>)>,
}

impl ScannedLiteral {
    /// Decoded value; invalid escapes are dropped.
    pub fn value(&self) -> String {
        let mut value = String::new();
        for segment in &self.segments {
            match segment {
                StringSegment::Text(text) => value.push_str(text),
                StringSegment::Escape { value: ch, .. } => value.push(*ch),
                StringSegment::Invalid(_) => {}
            }
        }
        value
    }

    /// Number of characters the literal denotes, counting each escape once.
    pub fn unit_count(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                StringSegment::Text(text) => text.chars().count(),
                _ => 1,
            })
            .sum()
    }
}

/// Scans a literal starting at the opening `quote` in `input`.
///
/// Stops at the matching quote, at an unescaped newline, or at the end of
/// input; the last two leave the literal unterminated.
pub fn scan_quoted(input: &str, quote: char) -> ScannedLiteral {
    let mut segments = vec![];
    let mut problems = vec![];
    let mut text = String::new();
    let mut pos = quote.len_utf8();

    let (len, terminated) = loop {
        let Some(ch) = input[pos..].chars().next() else {
            break (input.len(), false);
        };

        if ch == quote {
            break (pos + ch.len_utf8(), true);
        }
        if ch == '\n' {
            break (pos, false);
        }
        if ch != '\\' {
            text.push(ch);
            pos += ch.len_utf8();
            continue;
        }

        if !text.is_empty() {
            segments.push(StringSegment::Text(std::mem::take(&mut text)));
        }

        match ESCAPE.find(&input[pos..]) {
            Some(found) => {
                let raw = found.as_str();
                match decode_escape(raw) {
                    Some(value) => segments.push(StringSegment::Escape {
                        raw: raw.to_string(),
                        value,
                    }),
                    None => {
                        problems.push((
                            ErrorImpl::InvalidEscapeSequence {
                                sequence: raw.to_string(),
                            },
                            pos..pos + raw.len(),
                        ));
                        segments.push(StringSegment::Invalid(raw.to_string()));
                    }
                }
                pos += raw.len();
            }
            None => {
                // Skip the backslash and the character after it, unless that
                // character ends the literal.
                let mut end = pos + 1;
                if let Some(next) = input[end..].chars().next() {
                    if next != quote && next != '\n' {
                        end += next.len_utf8();
                    }
                }
                let raw = &input[pos..end];
                problems.push((
                    ErrorImpl::InvalidEscapeSequence {
                        sequence: raw.to_string(),
                    },
                    pos..end,
                ));
                segments.push(StringSegment::Invalid(raw.to_string()));
                pos = end;
            }
        }
    };

    if !text.is_empty() {
        segments.push(StringSegment::Text(text));
    }

    if !terminated {
        let problem = if quote == '\'' {
            ErrorImpl::UnterminatedChar
        } else {
            ErrorImpl::UnterminatedString
        };
        problems.push((problem, 0..len));
    }

    ScannedLiteral {
        len,
        terminated,
        segments,
        problems,
    }
}

/// Decodes one escape sequence (including the leading backslash).
///
/// Returns `None` when the code point is not a Unicode scalar value.
pub fn decode_escape(raw: &str) -> Option<char> {
    let body = raw.strip_prefix('\\')?;

    if let Some(hex) = body.strip_prefix('x') {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(hex) = body.strip_prefix("u{").and_then(|rest| rest.strip_suffix('}')) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if body.len() > 1 && body.chars().all(|c| c.is_ascii_digit()) {
        return body.parse::<u32>().ok().and_then(char::from_u32);
    }

    let mut chars = body.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    Some(match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_plain_string() {
        let scanned = scan_quoted("\"hello\" rest", '"');
        assert!(scanned.terminated);
        assert_eq!(scanned.len, 7);
        assert_eq!(scanned.segments, vec![StringSegment::Text("hello".to_string())]);
        assert!(scanned.problems.is_empty());
    }

    #[test]
    fn test_scan_segments_split_on_escapes() {
        let scanned = scan_quoted(r#""a\tb\x41""#, '"');
        assert_eq!(
            scanned.segments,
            vec![
                StringSegment::Text("a".to_string()),
                StringSegment::Escape { raw: "\\t".to_string(), value: '\t' },
                StringSegment::Text("b".to_string()),
                StringSegment::Escape { raw: "\\x41".to_string(), value: 'A' },
            ]
        );
        assert_eq!(scanned.value(), "a\tbA");
    }

    #[test]
    fn test_decode_escape_forms() {
        assert_eq!(decode_escape("\\x41"), Some('A'));
        assert_eq!(decode_escape("\\u{1F600}"), Some('\u{1F600}'));
        assert_eq!(decode_escape("\\65"), Some('A'));
        assert_eq!(decode_escape("\\\""), Some('"'));
        assert_eq!(decode_escape("\\q"), Some('q'));
        assert_eq!(decode_escape("\\u{D800}"), None);
        assert_eq!(decode_escape("\\u{110000}"), None);
    }

    #[test]
    fn test_hex_escape_is_greedy() {
        let scanned = scan_quoted(r#""\x41BC""#, '"');
        assert_eq!(scanned.value(), "\u{41BC}");
    }

    #[test]
    fn test_invalid_escape_resumes_after_offending_character() {
        let scanned = scan_quoted(r#""a\Ub""#, '"');
        assert!(scanned.terminated);
        assert_eq!(scanned.problems.len(), 1);
        assert_eq!(scanned.problems[0].1, 2..4);
        assert_eq!(scanned.value(), "ab");
    }

    #[test]
    fn test_unterminated_stops_at_newline() {
        let scanned = scan_quoted("\"abc\nnext", '"');
        assert!(!scanned.terminated);
        assert_eq!(scanned.len, 4);
        assert!(matches!(scanned.problems[0].0, ErrorImpl::UnterminatedString));
    }
}
