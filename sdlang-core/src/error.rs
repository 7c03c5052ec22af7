//! Error types for scanning, pushing, and tree building.
//!
//! Every failure aborts the parse. Errors carry the [`Span`] of the token
//! (or character) that caused them, plus the offending lexeme or name.
//!
//! Error kinds are an enum rather than strings; [`ErrorKind::code`] gives a
//! stable kebab-case identifier for each one.

use thiserror::Error;

use crate::span::Span;
use crate::token::TokenKind;
use crate::value::ValueKind;

/// A parse failure with its source location.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {}..{}", .span.start, .span.end)]
pub struct ParseError {
    #[source]
    pub kind: ErrorKind,
    pub span: Span,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// An error raised by a consumer, which has no span of its own.
    ///
    /// The pusher fills in the span of the current token.
    #[must_use]
    pub fn unlocated(kind: ErrorKind) -> Self {
        Self::new(kind, Span::default())
    }

    #[must_use]
    pub fn unexpected_char(c: char, span: Span) -> Self {
        Self::new(ErrorKind::UnexpectedCharacter(c), span)
    }

    #[must_use]
    pub fn unexpected_token(kind: TokenKind, span: Span) -> Self {
        Self::new(ErrorKind::UnexpectedToken(kind), span)
    }

    /// Attach `span` unless the error already has one.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        if self.span == Span::default() {
            self.span = span;
        }
        self
    }

    #[inline]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // ---- Lexical ----
    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated binary literal")]
    UnterminatedBinary,

    #[error("newline in string literal must be escaped")]
    UnescapedNewlineInString,

    #[error("carriage return not followed by line feed")]
    StrayCarriageReturn,

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("unexpected character '{0}' in number literal")]
    UnexpectedCharacterInNumber(char),

    #[error("malformed duration: bad {0} component")]
    MalformedDuration(&'static str),

    #[error("malformed date '{0}'")]
    MalformedDate(String),

    #[error("invalid timezone '{0}'")]
    InvalidTimezone(String),

    #[error("malformed string: {0}")]
    MalformedString(String),

    #[error("malformed binary literal: {0}")]
    MalformedBinary(String),

    #[error("invalid {kind} literal '{lexeme}'")]
    InvalidNumber { lexeme: String, kind: TokenKind },

    // ---- Structural ----
    #[error("orphaned identifier '{0}': expected a tag name or attribute key")]
    OrphanedIdentifier(String),

    #[error("unexpected token {0}")]
    UnexpectedToken(TokenKind),

    #[error("close block without a matching open block")]
    StrayCloseBlock,

    #[error("value or attribute outside any tag")]
    DetachedValue,

    #[error("block of tag '{0}' is never closed")]
    UnclosedBlock(String),

    #[error("tag '{tag}' already has an attribute '{attribute}'")]
    DuplicateAttribute { tag: String, attribute: String },

    // ---- Value model ----
    #[error("{0} literals are not supported")]
    UnsupportedLiteralWidth(TokenKind),

    #[error("token {kind} ('{lexeme}') does not carry a value")]
    NotAValueToken { kind: TokenKind, lexeme: String },
}

impl ErrorKind {
    /// Stable identifier for this kind of error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnterminatedComment => "unterminated-comment",
            Self::UnterminatedString => "unterminated-string",
            Self::UnterminatedBinary => "unterminated-binary",
            Self::UnescapedNewlineInString => "unescaped-newline-in-string",
            Self::StrayCarriageReturn => "stray-carriage-return",
            Self::UnexpectedCharacter(_) => "unexpected-character",
            Self::UnexpectedCharacterInNumber(_) => "unexpected-character-in-number",
            Self::MalformedDuration(_) => "malformed-duration",
            Self::MalformedDate(_) => "malformed-date",
            Self::InvalidTimezone(_) => "invalid-timezone",
            Self::MalformedString(_) => "malformed-string",
            Self::MalformedBinary(_) => "malformed-binary",
            Self::InvalidNumber { .. } => "invalid-number",
            Self::OrphanedIdentifier(_) => "orphaned-identifier",
            Self::UnexpectedToken(_) => "unexpected-token",
            Self::StrayCloseBlock => "stray-close-block",
            Self::DetachedValue => "detached-value",
            Self::UnclosedBlock(_) => "unclosed-block",
            Self::DuplicateAttribute { .. } => "duplicate-attribute",
            Self::UnsupportedLiteralWidth(_) => "unsupported-literal-width",
            Self::NotAValueToken { .. } => "not-a-value-token",
        }
    }

    /// Lexical errors come from the scanner; everything else from the
    /// pusher, a consumer, or value materialization.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            Self::UnterminatedComment
                | Self::UnterminatedString
                | Self::UnterminatedBinary
                | Self::UnescapedNewlineInString
                | Self::StrayCarriageReturn
                | Self::UnexpectedCharacter(_)
                | Self::UnexpectedCharacterInNumber(_)
                | Self::MalformedDuration(_)
                | Self::MalformedDate(_)
                | Self::InvalidTimezone(_)
        )
    }
}

/// Misuse of a [`Value`](crate::Value) outside its active variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("expected {expected} value, found {found}")]
    TypeMismatch { expected: ValueKind, found: ValueKind },

    #[error("cannot compare {left} with {right}")]
    NotComparable { left: ValueKind, right: ValueKind },
}

/// Failed query against a finished [`Tag`](crate::Tag).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("tag '{tag}' has no value at index {index}")]
    MissingValue { tag: String, index: usize },

    #[error("tag '{tag}' has no attribute '{name}'")]
    MissingAttribute { tag: String, name: String },

    #[error(transparent)]
    Value(#[from] ValueError),
}
