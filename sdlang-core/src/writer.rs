//! Tag tree back to SDLang text.
//!
//! Output re-parses to an equal tree: values use their lossless
//! [`Display`](std::fmt::Display) forms and attributes are sorted by name.

use std::fmt::{self, Write};

use crate::tree::Tag;

const INDENT: &str = "    ";

/// Write `tag` as one line at `depth` levels of indentation, followed by
/// its block of children if it has any.
pub fn write_tag<W: Write>(out: &mut W, tag: &Tag, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }

    // An anonymous tag needs at least one value or attribute to stay
    // anonymous on re-parse.
    let mut first = true;
    if !tag.is_anonymous() || (tag.values.is_empty() && tag.attributes.is_empty()) {
        out.write_str(tag.name.as_str())?;
        first = false;
    }

    let mut sep = |out: &mut W| -> fmt::Result {
        if !first {
            out.write_char(' ')?;
        }
        first = false;
        Ok(())
    };

    for value in &tag.values {
        sep(out)?;
        write!(out, "{}", value)?;
    }
    for attr in tag.sorted_attributes() {
        sep(out)?;
        write!(out, "{}={}", attr.name, attr.value)?;
    }

    if !tag.children.is_empty() {
        out.write_str(" {\n")?;
        write_children(out, tag, depth + 1)?;
        for _ in 0..depth {
            out.write_str(INDENT)?;
        }
        out.write_char('}')?;
    }
    out.write_char('\n')
}

fn write_children<W: Write>(out: &mut W, tag: &Tag, depth: usize) -> fmt::Result {
    for child in &tag.children {
        write_tag(out, child, depth)?;
    }
    Ok(())
}

impl Tag {
    /// Render this tag's children as a document, as [`Tag::parse`] would
    /// read them back.
    pub fn to_sdl_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = write_children(&mut out, self, 0);
        out
    }
}
