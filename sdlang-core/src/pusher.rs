//! Token stream to event stream.
//!
//! The pusher drives a [`Scanner`] and turns tokens into [`Visitor`]
//! events. It keeps one flag of state, whether the current line has had
//! any content yet, and resolves two ambiguities:
//!
//! - An identifier followed by `=` is an attribute key. Any other
//!   identifier must open its line, where it names a tag.
//! - A literal or attribute that opens a line belongs to an implicit tag
//!   named [`ANONYMOUS_TAG_NAME`].
//!
//! Attribute detection needs one token of lookahead. The scanner is
//! copied, the copy advanced, and the copy assigned back only once the
//! whole `key = value` triple has been handled.

use crate::error::{ErrorKind, ParseError};
use crate::event::{Consumer, RawVisitor, ValueVisitor, ANONYMOUS_TAG_NAME};
use crate::materialize::materialize;
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};
use crate::value::Value;

/// The value of one literal token, materialized on first request.
struct LazyValue<'t, 'a> {
    token: &'t Token<'a>,
    value: Option<Value>,
}

impl<'t, 'a> LazyValue<'t, 'a> {
    fn new(token: &'t Token<'a>) -> Self {
        LazyValue { token, value: None }
    }

    fn get(&mut self) -> Result<&Value, ParseError> {
        let value = match self.value.take() {
            Some(value) => value,
            None => materialize(self.token)?,
        };
        Ok(self.value.insert(value))
    }
}

/// Run the scanner to end of input, fanning events out to `consumers` in
/// registration order.
#[tracing::instrument(level = "debug", skip_all, fields(consumers = consumers.len()))]
pub fn push(scanner: &mut Scanner<'_>, consumers: &mut [Consumer<'_>]) -> Result<(), ParseError> {
    for consumer in consumers.iter_mut() {
        consumer.reset()?;
    }

    let mut start_of_line = true;
    let mut token = scanner.advance()?;
    loop {
        tracing::trace!(kind = %token.kind, lexeme = token.lexeme, start = token.span.start, "token");
        let span = token.span;
        let located = |e: ParseError| e.or_span(span);

        match token.kind {
            TokenKind::EndOfFile => {
                for consumer in consumers.iter_mut() {
                    consumer.end_of_file().map_err(located)?;
                }
                return Ok(());
            }
            TokenKind::EndOfLine => {
                start_of_line = true;
                token = scanner.advance()?;
                continue;
            }
            TokenKind::Comment => {
                for consumer in consumers.iter_mut() {
                    consumer.comment(token.lexeme).map_err(located)?;
                }
            }
            TokenKind::BlockOpen => {
                for consumer in consumers.iter_mut() {
                    consumer.open_block().map_err(located)?;
                }
            }
            TokenKind::BlockClose => {
                for consumer in consumers.iter_mut() {
                    consumer.close_block().map_err(located)?;
                }
            }
            kind if kind.is_value() => {
                if start_of_line {
                    start_anonymous(consumers).map_err(located)?;
                }
                let mut value = LazyValue::new(&token);
                for consumer in consumers.iter_mut() {
                    let delivered = match consumer {
                        Consumer::Value(v) => v.new_value(value.get()?),
                        Consumer::Raw(r) => r.new_value(token.kind, token.lexeme),
                    };
                    delivered.map_err(located)?;
                }
            }
            TokenKind::Identifier => {
                let mut lookahead = *scanner;
                if lookahead.advance()?.kind == TokenKind::Equals {
                    let value_token = lookahead.advance()?;
                    if !value_token.kind.is_value() {
                        return Err(ParseError::unexpected_token(value_token.kind, value_token.span));
                    }
                    if start_of_line {
                        start_anonymous(consumers).map_err(located)?;
                    }
                    let at_value = |e: ParseError| e.or_span(value_token.span);
                    let mut value = LazyValue::new(&value_token);
                    for consumer in consumers.iter_mut() {
                        let delivered = match consumer {
                            Consumer::Value(v) => v.new_attribute(token.lexeme, value.get()?),
                            Consumer::Raw(r) => {
                                r.new_attribute(value_token.kind, token.lexeme, value_token.lexeme)
                            }
                        };
                        delivered.map_err(at_value)?;
                    }
                    *scanner = lookahead;
                } else if start_of_line {
                    for consumer in consumers.iter_mut() {
                        consumer.start_tag(token.lexeme).map_err(located)?;
                    }
                } else {
                    return Err(ParseError::new(
                        ErrorKind::OrphanedIdentifier(token.lexeme.to_string()),
                        span,
                    ));
                }
            }
            other => return Err(ParseError::unexpected_token(other, span)),
        }

        start_of_line = false;
        token = scanner.advance()?;
    }
}

fn start_anonymous(consumers: &mut [Consumer<'_>]) -> Result<(), ParseError> {
    for consumer in consumers.iter_mut() {
        consumer.start_tag(ANONYMOUS_TAG_NAME)?;
    }
    Ok(())
}

/// [`push`] with a single value consumer.
pub fn push_value<V: ValueVisitor>(scanner: &mut Scanner<'_>, visitor: &mut V) -> Result<(), ParseError> {
    push(scanner, &mut [Consumer::Value(visitor)])
}

/// [`push`] with a single raw consumer.
pub fn push_raw<V: RawVisitor>(scanner: &mut Scanner<'_>, visitor: &mut V) -> Result<(), ParseError> {
    push(scanner, &mut [Consumer::Raw(visitor)])
}

// ============================================================================
// Tests
// ============================================================================
