//! Escape decoding for double-quoted string lexemes.
//!
//! The scanner keeps the raw text of a `"..."` literal. Decoding is opt-in
//! and lazy: [`unescape`] yields borrowed chunks of plain text interleaved
//! with the decoded escapes, so callers that only stream the text never
//! allocate.
//!
//! Recognized sequences:
//!
//! | Source            | Yields                    |
//! |-------------------|---------------------------|
//! | `\n` `\t` `\r`    | newline, tab, CR          |
//! | `\"` `\\`         | quote, backslash          |
//! | `\` + line break  | nothing; leading spaces and tabs of the next line are dropped |
//! | raw CRLF          | `\n`                      |

use std::borrow::Cow;

use crate::error::{ErrorKind, ParseError};
use crate::find::find_any;

/// Lazy decoder over one lexeme. See [`unescape`].
#[derive(Debug, Clone)]
pub struct Unescape<'a> {
    rest: &'a str,
}

/// Decode `lexeme` chunk by chunk.
///
/// After the first error the iterator is exhausted. Errors carry no span;
/// callers attach the token's span.
pub fn unescape(lexeme: &str) -> Unescape<'_> {
    Unescape { rest: lexeme }
}

/// Decode `lexeme` fully, borrowing when it holds nothing to decode.
pub fn decode_string(lexeme: &str) -> Result<Cow<'_, str>, ParseError> {
    if find_any(lexeme.as_bytes(), b"\\\r") == lexeme.len() {
        return Ok(Cow::Borrowed(lexeme));
    }
    let mut out = String::with_capacity(lexeme.len());
    for chunk in unescape(lexeme) {
        out.push_str(chunk?);
    }
    Ok(Cow::Owned(out))
}

fn malformed(msg: &str) -> ParseError {
    ParseError::unlocated(ErrorKind::MalformedString(msg.to_string()))
}

impl<'a> Unescape<'a> {
    fn fail(&mut self, msg: &str) -> Option<Result<&'a str, ParseError>> {
        self.rest = "";
        Some(Err(malformed(msg)))
    }

    /// Drop a line break and the indentation after it.
    fn skip_continuation(&mut self, break_len: usize) {
        let after = &self.rest[break_len..];
        let indent = after
            .bytes()
            .position(|b| b != b' ' && b != b'\t')
            .unwrap_or(after.len());
        self.rest = &after[indent..];
    }
}

impl<'a> Iterator for Unescape<'a> {
    type Item = Result<&'a str, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.rest.is_empty() {
                return None;
            }

            let bytes = self.rest.as_bytes();
            let stop = find_any(bytes, b"\\\r");
            if stop > 0 {
                let (plain, rest) = self.rest.split_at(stop);
                self.rest = rest;
                return Some(Ok(plain));
            }

            if bytes[0] == b'\r' {
                if bytes.get(1) == Some(&b'\n') {
                    self.rest = &self.rest[2..];
                    return Some(Ok("\n"));
                }
                return self.fail("carriage return not followed by line feed");
            }

            // Backslash.
            let decoded = match bytes.get(1) {
                Some(b'n') => "\n",
                Some(b't') => "\t",
                Some(b'r') => "\r",
                Some(b'"') => "\"",
                Some(b'\\') => "\\",
                Some(b'\n') => {
                    self.skip_continuation(2);
                    continue;
                }
                Some(b'\r') if bytes.get(2) == Some(&b'\n') => {
                    self.skip_continuation(3);
                    continue;
                }
                Some(b'\r') => return self.fail("carriage return not followed by line feed"),
                Some(_) => {
                    let c = self.rest[1..].chars().next().unwrap_or('\\');
                    return self.fail(&format!("unknown escape sequence '\\{}'", c));
                }
                None => return self.fail("trailing backslash"),
            };
            self.rest = &self.rest[2..];
            return Some(Ok(decoded));
        }
    }
}
