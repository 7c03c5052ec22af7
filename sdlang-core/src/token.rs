//! Tokens produced by the [`Scanner`](crate::Scanner).
//!
//! A [`Token`] borrows its lexeme from the input buffer. It is `Copy`, so a
//! consumer that needs to keep one past the next scan step just copies it.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, FixedOffset};

use crate::error::{ErrorKind, ParseError};
use crate::escape;
use crate::span::Span;
use crate::value::TimeSpan;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    Identifier,
    StringDoubleQuoted,
    StringBackQuoted,
    NumberInt32,
    NumberInt64,
    NumberFloat32,
    NumberFloat64,
    NumberFloat128,
    BooleanTrue,
    BooleanFalse,
    Null,
    Date,
    DateTime,
    TimeSpan,
    Binary,
    BlockOpen,
    BlockClose,
    Equals,
    EndOfLine,
    EndOfFile,
}

impl TokenKind {
    /// True for the literal kinds that materialize into a [`Value`](crate::Value).
    #[inline]
    pub fn is_value(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            StringDoubleQuoted
                | StringBackQuoted
                | NumberInt32
                | NumberInt64
                | NumberFloat32
                | NumberFloat64
                | NumberFloat128
                | BooleanTrue
                | BooleanFalse
                | Null
                | Date
                | DateTime
                | TimeSpan
                | Binary
        )
    }

    #[inline]
    pub fn is_string(self) -> bool {
        matches!(self, TokenKind::StringDoubleQuoted | TokenKind::StringBackQuoted)
    }

    #[inline]
    pub fn is_number(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            NumberInt32 | NumberInt64 | NumberFloat32 | NumberFloat64 | NumberFloat128
        )
    }

    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Comment => "Comment",
            Identifier => "Identifier",
            StringDoubleQuoted => "StringDoubleQuoted",
            StringBackQuoted => "StringBackQuoted",
            NumberInt32 => "NumberInt32",
            NumberInt64 => "NumberInt64",
            NumberFloat32 => "NumberFloat32",
            NumberFloat64 => "NumberFloat64",
            NumberFloat128 => "NumberFloat128",
            BooleanTrue => "BooleanTrue",
            BooleanFalse => "BooleanFalse",
            Null => "Null",
            Date => "Date",
            DateTime => "DateTime",
            TimeSpan => "TimeSpan",
            Binary => "Binary",
            BlockOpen => "BlockOpen",
            BlockClose => "BlockClose",
            Equals => "Equals",
            EndOfLine => "EndOfLine",
            EndOfFile => "EndOfFile",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded payload for temporal tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Literal {
    #[default]
    None,
    DateTime(DateTime<FixedOffset>),
    TimeSpan(TimeSpan),
}

/// One scanned token.
///
/// `lexeme` excludes delimiters: quotes, brackets, comment markers and
/// number width suffixes. `span` covers the full source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub span: Span,
    pub literal: Literal,
    /// Identifier only: text before the last `:`, empty when there is none.
    pub tag_namespace: &'a str,
    /// Identifier only: text after the last `:`.
    pub tag_name: &'a str,
}

impl<'a> Token<'a> {
    pub(crate) fn new(kind: TokenKind, lexeme: &'a str, span: Span) -> Self {
        Token {
            kind,
            lexeme,
            span,
            literal: Literal::None,
            tag_namespace: "",
            tag_name: "",
        }
    }

    pub(crate) fn end_of_file(pos: usize) -> Self {
        Token::new(TokenKind::EndOfFile, "", Span::at(pos))
    }

    /// The text of a string token, with escapes decoded for the
    /// double-quoted form.
    pub fn string_value(&self) -> Result<Cow<'a, str>, ParseError> {
        match self.kind {
            TokenKind::StringBackQuoted => Ok(Cow::Borrowed(self.lexeme)),
            TokenKind::StringDoubleQuoted => {
                escape::decode_string(self.lexeme).map_err(|e| e.or_span(self.span))
            }
            kind => Err(ParseError::new(
                ErrorKind::NotAValueToken {
                    kind,
                    lexeme: self.lexeme.to_string(),
                },
                self.span,
            )),
        }
    }
}
