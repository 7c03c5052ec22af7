//! Event consumers - the output side of the [`pusher`](crate::pusher).
//!
//! This is a SAX-style model: the pusher calls one method per semantic
//! event and keeps nothing. Structure comes as `open_block`/`close_block`
//! pairs; it is up to the consumer to keep a stack.
//!
//! Every consumer implements the base [`Visitor`] plus exactly one
//! extension:
//!
//! - [`ValueVisitor`] receives materialized [`Value`]s.
//! - [`RawVisitor`] receives token kinds and raw lexemes, and never pays
//!   for materialization.
//!
//! The extension is picked once, when the consumer is wrapped in a
//! [`Consumer`].
//!
//! ## Event Sequences
//!
//! `server:web port=8080 "primary" {` emits:
//! ```text
//! start_tag("server:web")
//! new_attribute("port", Integer(8080))
//! new_value(String("primary"))
//! open_block
//! ```
//!
//! A line with no leading name gets the anonymous tag. `1 2 3` emits:
//! ```text
//! start_tag("content")
//! new_value(Integer(1))
//! new_value(Integer(2))
//! new_value(Integer(3))
//! ```

use std::fmt;

use crate::error::ParseError;
use crate::token::TokenKind;
use crate::value::Value;

/// Tag name given to values and attributes on a line with no tag name.
pub const ANONYMOUS_TAG_NAME: &str = "content";

/// Events shared by every consumer. All methods default to no-ops.
///
/// Errors returned here abort the parse. Leave the span empty; the pusher
/// fills in the span of the current token.
pub trait Visitor {
    /// Called once, before the first event of a parse.
    fn reset(&mut self) -> Result<(), ParseError> {
        Ok(())
    }

    fn open_block(&mut self) -> Result<(), ParseError> {
        Ok(())
    }

    fn close_block(&mut self) -> Result<(), ParseError> {
        Ok(())
    }

    /// Comment text with its delimiters stripped.
    fn comment(&mut self, _text: &str) -> Result<(), ParseError> {
        Ok(())
    }

    /// Qualified name as written, `namespace:name` or `name`.
    fn start_tag(&mut self, _name: &str) -> Result<(), ParseError> {
        Ok(())
    }

    fn end_of_file(&mut self) -> Result<(), ParseError> {
        Ok(())
    }
}

/// Consumer of materialized values.
pub trait ValueVisitor: Visitor {
    fn new_value(&mut self, value: &Value) -> Result<(), ParseError>;

    fn new_attribute(&mut self, name: &str, value: &Value) -> Result<(), ParseError>;
}

/// Consumer of raw literal tokens.
pub trait RawVisitor: Visitor {
    fn new_value(&mut self, kind: TokenKind, lexeme: &str) -> Result<(), ParseError>;

    fn new_attribute(&mut self, kind: TokenKind, name: &str, lexeme: &str) -> Result<(), ParseError>;
}

/// A registered consumer with its capability resolved.
pub enum Consumer<'v> {
    Value(&'v mut dyn ValueVisitor),
    Raw(&'v mut dyn RawVisitor),
}

impl<'v> Consumer<'v> {
    #[inline]
    pub fn wants_values(&self) -> bool {
        matches!(self, Consumer::Value(_))
    }

    pub(crate) fn reset(&mut self) -> Result<(), ParseError> {
        match self {
            Consumer::Value(v) => v.reset(),
            Consumer::Raw(r) => r.reset(),
        }
    }

    pub(crate) fn open_block(&mut self) -> Result<(), ParseError> {
        match self {
            Consumer::Value(v) => v.open_block(),
            Consumer::Raw(r) => r.open_block(),
        }
    }

    pub(crate) fn close_block(&mut self) -> Result<(), ParseError> {
        match self {
            Consumer::Value(v) => v.close_block(),
            Consumer::Raw(r) => r.close_block(),
        }
    }

    pub(crate) fn comment(&mut self, text: &str) -> Result<(), ParseError> {
        match self {
            Consumer::Value(v) => v.comment(text),
            Consumer::Raw(r) => r.comment(text),
        }
    }

    pub(crate) fn start_tag(&mut self, name: &str) -> Result<(), ParseError> {
        match self {
            Consumer::Value(v) => v.start_tag(name),
            Consumer::Raw(r) => r.start_tag(name),
        }
    }

    pub(crate) fn end_of_file(&mut self) -> Result<(), ParseError> {
        match self {
            Consumer::Value(v) => v.end_of_file(),
            Consumer::Raw(r) => r.end_of_file(),
        }
    }
}

impl<'v, V: ValueVisitor + 'v> From<&'v mut V> for Consumer<'v> {
    fn from(visitor: &'v mut V) -> Self {
        Consumer::Value(visitor)
    }
}

// ============================================================================
// Stock consumers
// ============================================================================

/// Value consumer that ignores everything. Measures scan + materialize.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVisitor;

impl Visitor for NullVisitor {}

impl ValueVisitor for NullVisitor {
    fn new_value(&mut self, _value: &Value) -> Result<(), ParseError> {
        Ok(())
    }

    fn new_attribute(&mut self, _name: &str, _value: &Value) -> Result<(), ParseError> {
        Ok(())
    }
}

/// Raw consumer that ignores everything. Measures scanning alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRawVisitor;

impl Visitor for NullRawVisitor {}

impl RawVisitor for NullRawVisitor {
    fn new_value(&mut self, _kind: TokenKind, _lexeme: &str) -> Result<(), ParseError> {
        Ok(())
    }

    fn new_attribute(&mut self, _kind: TokenKind, _name: &str, _lexeme: &str) -> Result<(), ParseError> {
        Ok(())
    }
}

/// One event as seen by an [`EventLog`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    OpenBlock,
    CloseBlock,
    Comment(String),
    StartTag(String),
    NewValue(Value),
    NewAttribute(String, Value),
    EndOfFile,
}

impl RecordedEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RecordedEvent::OpenBlock => "OpenBlock",
            RecordedEvent::CloseBlock => "CloseBlock",
            RecordedEvent::Comment(_) => "Comment",
            RecordedEvent::StartTag(_) => "StartTag",
            RecordedEvent::NewValue(_) => "NewValue",
            RecordedEvent::NewAttribute(..) => "NewAttribute",
            RecordedEvent::EndOfFile => "EndOfFile",
        }
    }

    /// Payload in source syntax: `name`, `literal` or `key=literal`.
    pub fn content(&self) -> Option<String> {
        match self {
            RecordedEvent::Comment(text) | RecordedEvent::StartTag(text) => Some(text.clone()),
            RecordedEvent::NewValue(value) => Some(value.to_string()),
            RecordedEvent::NewAttribute(name, value) => Some(format!("{}={}", name, value)),
            _ => None,
        }
    }
}

impl fmt::Display for RecordedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.content() {
            Some(content) => write!(f, "{} {:?}", self.name(), content),
            None => f.write_str(self.name()),
        }
    }
}

/// Value consumer that records every event.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<RecordedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visitor for EventLog {
    fn reset(&mut self) -> Result<(), ParseError> {
        self.events.clear();
        Ok(())
    }

    fn open_block(&mut self) -> Result<(), ParseError> {
        self.events.push(RecordedEvent::OpenBlock);
        Ok(())
    }

    fn close_block(&mut self) -> Result<(), ParseError> {
        self.events.push(RecordedEvent::CloseBlock);
        Ok(())
    }

    fn comment(&mut self, text: &str) -> Result<(), ParseError> {
        self.events.push(RecordedEvent::Comment(text.to_string()));
        Ok(())
    }

    fn start_tag(&mut self, name: &str) -> Result<(), ParseError> {
        self.events.push(RecordedEvent::StartTag(name.to_string()));
        Ok(())
    }

    fn end_of_file(&mut self) -> Result<(), ParseError> {
        self.events.push(RecordedEvent::EndOfFile);
        Ok(())
    }
}

impl ValueVisitor for EventLog {
    fn new_value(&mut self, value: &Value) -> Result<(), ParseError> {
        self.events.push(RecordedEvent::NewValue(value.clone()));
        Ok(())
    }

    fn new_attribute(&mut self, name: &str, value: &Value) -> Result<(), ParseError> {
        self.events
            .push(RecordedEvent::NewAttribute(name.to_string(), value.clone()));
        Ok(())
    }
}
