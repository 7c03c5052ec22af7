//! Tree representation for SDLang documents.
//!
//! A [`TreeBuilder`] consumes pusher events and assembles owned [`Tag`]s
//! under a synthetic root named `root`. Each tag owns its values,
//! attributes and children, so a finished tree has no ties to the input
//! buffer.
//!
//! # Example
//!
//! ```
//! use sdlang_core::Tag;
//!
//! let input = "server:web port=8080 \"primary\" {\n    path \"/www\"\n}\n";
//! let root = Tag::parse(input).unwrap();
//!
//! let server = &root.children[0];
//! assert_eq!(server.name.namespace(), Some("server"));
//! assert_eq!(server.attribute_integer("port").unwrap(), 8080);
//! assert_eq!(server.value_str(0).unwrap(), "primary");
//! assert!(server.has_child_called("path"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

use crate::error::{ErrorKind, ParseError, TreeError};
use crate::event::{ValueVisitor, Visitor, ANONYMOUS_TAG_NAME};
use crate::name::QualifiedName;
use crate::pusher::push_value;
use crate::scanner::Scanner;
use crate::token::TokenKind;
use crate::value::{TimeSpan, Value};

/// Name of the synthetic tag that holds a document's top-level tags.
pub const ROOT_TAG_NAME: &str = "root";

// ============================================================================
// Core Types
// ============================================================================

/// A named value attached to a tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: QualifiedName,
    pub value: Value,
}

/// A tag: positional values, named attributes, child tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: QualifiedName,
    pub values: Vec<Value>,
    pub attributes: HashMap<String, Attribute>,
    pub children: Vec<Tag>,
}

/// Typed value and attribute getters.
///
/// `value_<kind>(index)` and `attribute_<kind>(name)` fail when the slot is
/// missing or holds another kind; the `_or` forms fall back to a default in
/// both cases.
macro_rules! typed_getters {
    ($( $ty:ty => $value_fn:ident, $value_or:ident, $attr_fn:ident, $attr_or:ident, $as:ident; )*) => {
        $(
            pub fn $value_fn(&self, index: usize) -> Result<$ty, TreeError> {
                Ok(self.require_value(index)?.$as()?)
            }

            pub fn $value_or(&self, index: usize, default: $ty) -> $ty {
                self.$value_fn(index).unwrap_or(default)
            }

            pub fn $attr_fn(&self, name: &str) -> Result<$ty, TreeError> {
                Ok(self.require_attribute(name)?.$as()?)
            }

            pub fn $attr_or(&self, name: &str, default: $ty) -> $ty {
                self.$attr_fn(name).unwrap_or(default)
            }
        )*
    };
}

impl Tag {
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        Tag {
            name: name.into(),
            values: Vec::new(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Parse a whole document. The returned tag is the synthetic root.
    #[tracing::instrument(level = "debug", skip_all, fields(len = input.len()))]
    pub fn parse(input: &str) -> Result<Tag, ParseError> {
        let mut builder = TreeBuilder::new();
        push_value(&mut Scanner::new(input), &mut builder)?;
        builder.finish()
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS_TAG_NAME
    }

    // ---- Values ----

    #[inline]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[inline]
    pub fn has_value_at(&self, index: usize) -> bool {
        index < self.values.len()
    }

    fn require_value(&self, index: usize) -> Result<&Value, TreeError> {
        self.value(index).ok_or_else(|| TreeError::MissingValue {
            tag: self.name.to_string(),
            index,
        })
    }

    // ---- Attributes ----

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    #[inline]
    pub fn attribute_value(&self, name: &str) -> Option<&Value> {
        self.attribute(name).map(|a| &a.value)
    }

    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    fn require_attribute(&self, name: &str) -> Result<&Value, TreeError> {
        self.attribute_value(name)
            .ok_or_else(|| TreeError::MissingAttribute {
                tag: self.name.to_string(),
                name: name.to_string(),
            })
    }

    /// Attributes ordered by name.
    pub fn sorted_attributes(&self) -> Vec<&Attribute> {
        let mut attrs: Vec<&Attribute> = self.attributes.values().collect();
        attrs.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        attrs
    }

    // ---- Children ----

    #[inline]
    pub fn has_child_at(&self, index: usize) -> bool {
        index < self.children.len()
    }

    pub fn has_child_called(&self, name: &str) -> bool {
        self.children.iter().any(|c| c.name == name)
    }

    pub fn children_called<'t>(&'t self, name: &'t str) -> impl Iterator<Item = &'t Tag> + 't {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First child with this qualified name.
    pub fn child<'t>(&'t self, name: &'t str) -> Option<&'t Tag> {
        self.children_called(name).next()
    }

    typed_getters! {
        i64 => value_integer, value_integer_or, attribute_integer, attribute_integer_or, as_integer;
        f64 => value_floating, value_floating_or, attribute_floating, attribute_floating_or, as_floating;
        bool => value_boolean, value_boolean_or, attribute_boolean, attribute_boolean_or, as_boolean;
        TimeSpan => value_time_span, value_time_span_or, attribute_time_span, attribute_time_span_or, as_time_span;
        DateTime<FixedOffset> => value_date_time, value_date_time_or, attribute_date_time, attribute_date_time_or, as_date_time;
    }

    pub fn value_str(&self, index: usize) -> Result<&str, TreeError> {
        Ok(self.require_value(index)?.as_str()?)
    }

    pub fn value_str_or<'t>(&'t self, index: usize, default: &'t str) -> &'t str {
        self.value_str(index).unwrap_or(default)
    }

    pub fn attribute_str(&self, name: &str) -> Result<&str, TreeError> {
        Ok(self.require_attribute(name)?.as_str()?)
    }

    pub fn attribute_str_or<'t>(&'t self, name: &str, default: &'t str) -> &'t str {
        self.attribute_str(name).unwrap_or(default)
    }

    pub fn value_binary(&self, index: usize) -> Result<&[u8], TreeError> {
        Ok(self.require_value(index)?.as_binary()?)
    }

    pub fn attribute_binary(&self, name: &str) -> Result<&[u8], TreeError> {
        Ok(self.require_attribute(name)?.as_binary()?)
    }
}

// ============================================================================
// Tree Builder
// ============================================================================

/// Value consumer that builds a [`Tag`] tree.
///
/// `open` holds the tags whose blocks are open, innermost last. New tags go
/// into the innermost open scope (or the root); the most recently started
/// tag in that scope is the target for values and attributes.
#[derive(Debug)]
pub struct TreeBuilder {
    root: Tag,
    open: Vec<Tag>,
    has_current: bool,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            root: Tag::new(ROOT_TAG_NAME),
            open: Vec::new(),
            has_current: false,
        }
    }

    /// Open blocks plus the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.open.len() + 1
    }

    fn scope(&mut self) -> &mut Tag {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    fn current(&mut self) -> Result<&mut Tag, ParseError> {
        if !self.has_current {
            return Err(ParseError::unlocated(ErrorKind::DetachedValue));
        }
        self.scope()
            .children
            .last_mut()
            .ok_or_else(|| ParseError::unlocated(ErrorKind::DetachedValue))
    }

    fn unclosed(&self) -> Option<ParseError> {
        self.open
            .last()
            .map(|tag| ParseError::unlocated(ErrorKind::UnclosedBlock(tag.name.to_string())))
    }

    /// The finished root. Fails if any block is still open.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn finish(self) -> Result<Tag, ParseError> {
        match self.unclosed() {
            Some(err) => Err(err),
            None => Ok(self.root),
        }
    }
}

impl Visitor for TreeBuilder {
    fn reset(&mut self) -> Result<(), ParseError> {
        *self = TreeBuilder::new();
        Ok(())
    }

    fn open_block(&mut self) -> Result<(), ParseError> {
        let tag = match self.has_current {
            true => self.scope().children.pop(),
            false => None,
        };
        let tag = tag.ok_or_else(|| {
            ParseError::unlocated(ErrorKind::UnexpectedToken(TokenKind::BlockOpen))
        })?;
        self.open.push(tag);
        self.has_current = false;
        Ok(())
    }

    fn close_block(&mut self) -> Result<(), ParseError> {
        let tag = self
            .open
            .pop()
            .ok_or_else(|| ParseError::unlocated(ErrorKind::StrayCloseBlock))?;
        self.scope().children.push(tag);
        self.has_current = false;
        Ok(())
    }

    fn start_tag(&mut self, name: &str) -> Result<(), ParseError> {
        self.scope().children.push(Tag::new(name));
        self.has_current = true;
        Ok(())
    }

    fn end_of_file(&mut self) -> Result<(), ParseError> {
        match self.unclosed() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ValueVisitor for TreeBuilder {
    fn new_value(&mut self, value: &Value) -> Result<(), ParseError> {
        self.current()?.values.push(value.clone());
        Ok(())
    }

    fn new_attribute(&mut self, name: &str, value: &Value) -> Result<(), ParseError> {
        let tag = self.current()?;
        if tag.attributes.contains_key(name) {
            return Err(ParseError::unlocated(ErrorKind::DuplicateAttribute {
                tag: tag.name.to_string(),
                attribute: name.to_string(),
            }));
        }
        tag.attributes.insert(
            name.to_string(),
            Attribute {
                name: QualifiedName::new(name),
                value: value.clone(),
            },
        );
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueError;
    use crate::value::ValueKind;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Tag {
        Tag::parse(input).unwrap()
    }

    fn error(input: &str) -> ParseError {
        Tag::parse(input).unwrap_err()
    }

    #[test]
    fn test_simple_tag() {
        let root = parse("title \"Hello\"\n");
        assert_eq!(root.name, ROOT_TAG_NAME);
        assert_eq!(root.children.len(), 1);
        let title = &root.children[0];
        assert_eq!(title.name, "title");
        assert_eq!(title.values, vec![Value::from("Hello")]);
    }

    #[test]
    fn test_nested_tags() {
        let root = parse("a {\n  b {\n    c 1\n  }\n  d 2\n}\ne 3\n");
        assert_eq!(root.children.len(), 2);
        let a = &root.children[0];
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[0].name, "b");
        assert_eq!(a.children[0].children[0].name, "c");
        assert_eq!(a.children[1].value_integer(0).unwrap(), 2);
        assert_eq!(root.children[1].name, "e");
    }

    #[test]
    fn test_siblings_keep_order() {
        let root = parse("x 1\nx 2\ny 3\nx 4\n");
        let xs: Vec<i64> = root
            .children_called("x")
            .map(|t| t.value_integer(0).unwrap())
            .collect();
        assert_eq!(xs, vec![1, 2, 4]);
        assert!(root.has_child_at(3));
        assert!(!root.has_child_at(4));
        assert_eq!(root.child("y").unwrap().value_integer(0).unwrap(), 3);
    }

    #[test]
    fn test_matrix_children() {
        let root = parse("matrix {\n    1 1 1\n    2 2 2\n    3 3 3\n}\n");
        let matrix = &root.children[0];
        assert_eq!(matrix.children.len(), 3);
        assert!(matrix.children.iter().all(Tag::is_anonymous));
        let sum: i64 = matrix
            .children
            .iter()
            .flat_map(|row| row.values.iter())
            .map(|v| v.as_integer().unwrap())
            .sum();
        assert_eq!(sum, 18);
    }

    #[test]
    fn test_attributes() {
        let root = parse("this:is a=`simple` 1 line=\"tag\" on 2021/03/27\n");
        let tag = &root.children[0];
        assert_eq!(tag.name.namespace(), Some("this"));
        assert_eq!(tag.name.name(), "is");
        assert_eq!(tag.attribute_str("a").unwrap(), "simple");
        assert_eq!(tag.attribute_str("line").unwrap(), "tag");
        assert_eq!(tag.values.len(), 3);
        assert_eq!(tag.value_integer(0).unwrap(), 1);
        assert!(tag.value_boolean(1).unwrap());
        assert!(tag.value_date_time(2).is_ok());
    }

    #[test]
    fn test_typed_getter_errors() {
        let root = parse("t 1 name=\"n\"\n");
        let t = &root.children[0];
        assert_eq!(
            t.value_integer(5),
            Err(TreeError::MissingValue {
                tag: "t".into(),
                index: 5
            })
        );
        assert_eq!(
            t.value_str(0),
            Err(TreeError::Value(ValueError::TypeMismatch {
                expected: ValueKind::String,
                found: ValueKind::Integer,
            }))
        );
        assert_eq!(
            t.attribute_integer("missing"),
            Err(TreeError::MissingAttribute {
                tag: "t".into(),
                name: "missing".into()
            })
        );
        assert_eq!(t.value_integer_or(5, -1), -1);
        assert_eq!(t.attribute_str_or("name", "x"), "n");
        assert_eq!(t.attribute_str_or("other", "x"), "x");
    }

    #[test]
    fn test_duplicate_attribute() {
        let err = error("x a=1 a=2\n");
        assert_eq!(
            err.kind,
            ErrorKind::DuplicateAttribute {
                tag: "x".into(),
                attribute: "a".into()
            }
        );
        assert_eq!(err.span.start, 8);
    }

    #[test]
    fn test_stray_close_block() {
        let err = error("a 1\n}\nb 2\n");
        assert_eq!(err.kind, ErrorKind::StrayCloseBlock);
        assert_eq!(err.span.start, 4);
    }

    #[test]
    fn test_unclosed_block() {
        let err = error("outer {\n  inner {\n    x 1\n  }\n");
        assert_eq!(err.kind, ErrorKind::UnclosedBlock("outer".into()));
    }

    #[test]
    fn test_open_block_without_tag() {
        let err = error("{\n}\n");
        assert_eq!(err.code(), "unexpected-token");
    }

    #[test]
    fn test_value_after_close_is_detached() {
        let err = error("a {\n} 1\n");
        assert_eq!(err.kind, ErrorKind::DetachedValue);
    }

    #[test]
    fn test_builder_reset_between_parses() {
        let mut builder = TreeBuilder::new();
        push_value(&mut Scanner::new("a {\n"), &mut builder).unwrap_err();
        push_value(&mut Scanner::new("b 1\n"), &mut builder).unwrap();
        let root = builder.finish().unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "b");
    }
}
