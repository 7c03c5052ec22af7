//! Zero-copy SDLang scanner.
//!
//! [`Scanner::advance`] pulls one token at a time. Lexemes are `&'a str`
//! slices of the input; nothing is copied until a value is materialized.
//!
//! # Architecture
//!
//! - Dispatch is on the first byte of each token, after skipping spaces
//!   and tabs. Newlines and `;` are tokens, not whitespace.
//! - Every "scan to the next X" step goes through [`find_any`], so long
//!   comments, strings and binary blobs are crossed with `memchr`.
//! - Numbers that turn out to be dates or durations are re-read by
//!   [`temporal`](crate::temporal) from their first byte.
//! - The scanner is `Copy`. Lookahead is a copy advanced independently,
//!   then either assigned back or dropped.
//!
//! ```
//! use sdlang_core::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("size 42L\n");
//! assert_eq!(scanner.advance().unwrap().kind, TokenKind::Identifier);
//! let number = scanner.advance().unwrap();
//! assert_eq!((number.kind, number.lexeme), (TokenKind::NumberInt64, "42"));
//! assert_eq!(scanner.advance().unwrap().kind, TokenKind::EndOfLine);
//! assert_eq!(scanner.advance().unwrap().kind, TokenKind::EndOfFile);
//! ```

use phf::phf_map;
use unicode_xid::UnicodeXID;

use crate::error::{ErrorKind, ParseError};
use crate::find::find_any;
use crate::span::Span;
use crate::temporal::{self, is_literal_end};
use crate::token::{Literal, Token, TokenKind};

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "true" => TokenKind::BooleanTrue,
    "on" => TokenKind::BooleanTrue,
    "false" => TokenKind::BooleanFalse,
    "off" => TokenKind::BooleanFalse,
    "null" => TokenKind::Null,
};

/// Bytes that end an identifier, apart from end of input.
const IDENTIFIER_END: &[u8] = b": =\t\r\n;";

/// Pull-based tokenizer over one immutable input buffer.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    token: Token<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Scanner {
            src,
            pos: 0,
            token: Token::new(TokenKind::EndOfLine, "", Span::at(0)),
        }
    }

    /// The input being scanned.
    #[inline]
    pub fn source(&self) -> &'a str {
        self.src
    }

    /// Byte offset of the cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The most recently scanned token.
    #[inline]
    pub fn token(&self) -> &Token<'a> {
        &self.token
    }

    /// Scan the next token. Once `EndOfFile` is reached, every later call
    /// returns `EndOfFile` again.
    pub fn advance(&mut self) -> Result<Token<'a>, ParseError> {
        let token = self.scan()?;
        self.token = token;
        Ok(token)
    }

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    #[inline]
    fn peek_at(&self, at: usize) -> Option<u8> {
        self.bytes().get(at).copied()
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek_at(self.pos), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    /// Finish a token spanning `start..end` with `lexeme = src[lex_start..lex_end]`.
    fn emit(&mut self, kind: TokenKind, start: usize, lex: (usize, usize), end: usize) -> Token<'a> {
        self.pos = end;
        Token::new(kind, &self.src[lex.0..lex.1], Span::new(start, end))
    }

    fn error(&self, kind: ErrorKind, start: usize, end: usize) -> ParseError {
        ParseError::new(kind, Span::new(start, end))
    }

    fn scan(&mut self) -> Result<Token<'a>, ParseError> {
        loop {
            self.skip_blanks();
            let start = self.pos;
            let Some(b) = self.peek_at(start) else {
                return Ok(Token::end_of_file(self.src.len()));
            };

            return match b {
                b'\\' => match (self.peek_at(start + 1), self.peek_at(start + 2)) {
                    // Escaped line continuation is zero-width.
                    (Some(b'\n'), _) => {
                        self.pos += 2;
                        continue;
                    }
                    (Some(b'\r'), Some(b'\n')) => {
                        self.pos += 3;
                        continue;
                    }
                    _ => Err(ParseError::unexpected_char('\\', Span::new(start, start + 1))),
                },
                b'\n' | b';' => Ok(self.emit(TokenKind::EndOfLine, start, (start, start + 1), start + 1)),
                b'\r' => {
                    if self.peek_at(start + 1) == Some(b'\n') {
                        Ok(self.emit(TokenKind::EndOfLine, start, (start, start + 2), start + 2))
                    } else {
                        Err(self.error(ErrorKind::StrayCarriageReturn, start, start + 1))
                    }
                }
                b'#' => Ok(self.line_comment(start, start + 1)),
                b'-' if self.peek_at(start + 1) == Some(b'-') => Ok(self.line_comment(start, start + 2)),
                b'/' => match self.peek_at(start + 1) {
                    Some(b'/') => Ok(self.line_comment(start, start + 2)),
                    Some(b'*') => self.block_comment(start),
                    _ => Err(ParseError::unexpected_char('/', Span::new(start, start + 1))),
                },
                b'{' => Ok(self.emit(TokenKind::BlockOpen, start, (start, start + 1), start + 1)),
                b'}' => Ok(self.emit(TokenKind::BlockClose, start, (start, start + 1), start + 1)),
                b'=' => Ok(self.emit(TokenKind::Equals, start, (start, start + 1), start + 1)),
                b'"' => self.double_quoted(start),
                b'`' => self.delimited(start, b'`', TokenKind::StringBackQuoted, ErrorKind::UnterminatedString),
                b'[' => self.delimited(start, b']', TokenKind::Binary, ErrorKind::UnterminatedBinary),
                b'0'..=b'9' | b'-' => self.number(start),
                b'_' | b'a'..=b'z' | b'A'..=b'Z' => Ok(self.identifier(start)),
                _ => {
                    let c = self.src[start..].chars().next().unwrap_or('\u{FFFD}');
                    if c.is_xid_start() {
                        Ok(self.identifier(start))
                    } else {
                        Err(ParseError::unexpected_char(c, Span::new(start, start + c.len_utf8())))
                    }
                }
            };
        }
    }

    // ---- Comments ----

    /// `#`, `//`, `--` up to (not including) the line break.
    fn line_comment(&mut self, start: usize, body: usize) -> Token<'a> {
        let end = body + find_any(&self.bytes()[body..], b"\r\n");
        self.emit(TokenKind::Comment, start, (body, end), end)
    }

    fn block_comment(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let body = start + 2;
        let mut at = body;
        loop {
            at += find_any(&self.bytes()[at..], b"*");
            match (self.peek_at(at), self.peek_at(at + 1)) {
                (Some(b'*'), Some(b'/')) => {
                    return Ok(self.emit(TokenKind::Comment, start, (body, at), at + 2));
                }
                (Some(b'*'), Some(_)) => at += 1,
                _ => {
                    return Err(self.error(ErrorKind::UnterminatedComment, start, self.src.len()));
                }
            }
        }
    }

    // ---- Strings and binary ----

    /// Raw text between quotes. Backslash escapes are skipped, not decoded.
    fn double_quoted(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let body = start + 1;
        let mut at = body;
        loop {
            at += find_any(&self.bytes()[at..], b"\"\\\r\n");
            match self.peek_at(at) {
                None => return Err(self.error(ErrorKind::UnterminatedString, start, at)),
                Some(b'"') => {
                    return Ok(self.emit(TokenKind::StringDoubleQuoted, start, (body, at), at + 1));
                }
                Some(b'\\') => match (self.peek_at(at + 1), self.peek_at(at + 2)) {
                    (None, _) => return Err(self.error(ErrorKind::UnterminatedString, start, at + 1)),
                    (Some(b'\r'), Some(b'\n')) => at += 3,
                    _ => at += 2,
                },
                Some(_) => {
                    return Err(self.error(ErrorKind::UnescapedNewlineInString, start, at));
                }
            }
        }
    }

    /// Verbatim text up to `close`: back-quoted strings and binary blobs.
    fn delimited(
        &mut self,
        start: usize,
        close: u8,
        kind: TokenKind,
        unterminated: ErrorKind,
    ) -> Result<Token<'a>, ParseError> {
        let body = start + 1;
        let end = body + find_any(&self.bytes()[body..], &[close]);
        if end >= self.src.len() {
            return Err(self.error(unterminated, start, end));
        }
        Ok(self.emit(kind, start, (body, end), end + 1))
    }

    // ---- Identifiers ----

    fn identifier(&mut self, start: usize) -> Token<'a> {
        let mut at = start;
        let mut name_start = start;
        loop {
            at += find_any(&self.bytes()[at..], IDENTIFIER_END);
            if self.peek_at(at) == Some(b':') {
                at += 1;
                name_start = at;
            } else {
                break;
            }
        }

        let lexeme = &self.src[start..at];
        let kind = KEYWORDS.get(lexeme).copied().unwrap_or(TokenKind::Identifier);
        let mut token = self.emit(kind, start, (start, at), at);
        if kind == TokenKind::Identifier {
            token.tag_namespace = if name_start > start {
                &self.src[start..name_start - 1]
            } else {
                ""
            };
            token.tag_name = &self.src[name_start..at];
        }
        token
    }

    // ---- Numbers, dates, durations ----

    fn number(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let bytes = self.bytes();
        let digits = start + usize::from(bytes[start] == b'-');
        let run = bytes[digits..]
            .iter()
            .take_while(|b| b.is_ascii_digit() || **b == b'.')
            .count();
        let end = digits + run;
        if run == 0 || bytes[digits] == b'.' {
            let c = self.src[digits..].chars().next();
            let end = digits + c.map_or(0, char::len_utf8);
            return Err(self.error(ErrorKind::UnexpectedCharacterInNumber(c.unwrap_or('-')), start, end));
        }

        let number = |scanner: &mut Self, kind: TokenKind, suffix_len: usize| -> Result<Token<'a>, ParseError> {
            Ok(scanner.emit(kind, start, (start, end), end + suffix_len))
        };

        match self.peek_at(end) {
            None => number(self, TokenKind::NumberInt32, 0),
            next if is_literal_end(next) => number(self, TokenKind::NumberInt32, 0),
            Some(b':') => self.duration(start),
            Some(b'/') => self.date(start),
            Some(b'l' | b'L') => number(self, TokenKind::NumberInt64, 1),
            Some(b'f' | b'F') => number(self, TokenKind::NumberFloat32, 1),
            Some(b'd' | b'D') if self.peek_at(end + 1) == Some(b':') => self.duration(start),
            Some(b'd' | b'D') => number(self, TokenKind::NumberFloat64, 1),
            Some(b'b' | b'B') if matches!(self.peek_at(end + 1), Some(b'd' | b'D')) => {
                number(self, TokenKind::NumberFloat128, 2)
            }
            Some(_) => {
                let c = self.src[end..].chars().next().unwrap_or('\u{FFFD}');
                Err(self.error(ErrorKind::UnexpectedCharacterInNumber(c), start, end + c.len_utf8()))
            }
        }
    }

    fn duration(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let (span, end) = temporal::scan_duration(self.bytes(), start)?;
        let mut token = self.emit(TokenKind::TimeSpan, start, (start, end), end);
        token.literal = Literal::TimeSpan(span);
        Ok(token)
    }

    fn date(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let scanned = temporal::scan_date(self.bytes(), start)?;
        let kind = if scanned.has_time {
            TokenKind::DateTime
        } else {
            TokenKind::Date
        };
        let mut token = self.emit(kind, start, (start, scanned.end), scanned.end);
        token.literal = Literal::DateTime(scanned.value);
        Ok(token)
    }
}

// ============================================================================
// Tests
// ============================================================================
