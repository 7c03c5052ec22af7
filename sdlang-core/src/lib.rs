//! SDLang Core Parser
//!
//! Zero-copy, event-based parser for SDLang (Simple Declarative Language).
//! The scanner borrows its input; the pusher turns tokens into visitor
//! events; consumers decide what to keep.
//!
//! # Architecture
//!
//! - **find.rs** - Multi-needle byte search, vector or scalar
//! - **scanner.rs** - Zero-copy tokenizer, one token per `advance()`
//! - **temporal.rs** - Date, date-time and duration sub-scanners
//! - **escape.rs** - Lazy decoding of double-quoted strings
//! - **materialize.rs** - Literal tokens to [`Value`]s
//! - **event.rs** - Visitor traits and stock consumers
//! - **pusher.rs** - Token stream to event stream
//! - **tree.rs** - [`Tag`] tree and the [`TreeBuilder`] consumer
//! - **writer.rs** - Tag tree back to SDLang text
//! - **value.rs**, **name.rs**, **span.rs**, **error.rs** - Shared types
//!
//! ```
//! use sdlang_core::Tag;
//!
//! let root = Tag::parse("matrix {\n  1 2 3\n}\n").unwrap();
//! let row = &root.children[0].children[0];
//! assert!(row.is_anonymous());
//! assert_eq!(row.values.len(), 3);
//! ```

pub mod error;
pub mod escape;
pub mod event;
pub mod find;
pub mod materialize;
pub mod name;
pub mod pusher;
pub mod scanner;
pub mod span;
mod temporal;
pub mod token;
pub mod tree;
pub mod value;
pub mod writer;

pub use error::{ErrorKind, ParseError, TreeError, ValueError};
pub use escape::decode_string;
pub use event::{
    Consumer, EventLog, NullRawVisitor, NullVisitor, RawVisitor, RecordedEvent, ValueVisitor, Visitor,
    ANONYMOUS_TAG_NAME,
};
pub use materialize::materialize;
pub use name::QualifiedName;
pub use pusher::{push, push_raw, push_value};
pub use scanner::Scanner;
pub use span::Span;
pub use token::{Literal, Token, TokenKind};
pub use tree::{Attribute, Tag, TreeBuilder, ROOT_TAG_NAME};
pub use value::{TimeSpan, Value, ValueKind};
