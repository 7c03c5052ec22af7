//! Qualified tag and attribute names: `namespace:name` or `name`.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A name with an optional namespace, split at the first `:`.
///
/// Only the colon index is stored; the views are sliced on demand.
#[derive(Debug, Clone, Eq)]
pub struct QualifiedName {
    raw: String,
    colon: Option<usize>,
}

impl QualifiedName {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let colon = raw.find(':');
        QualifiedName { raw, colon }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The part after the first colon, or the whole name.
    #[inline]
    pub fn name(&self) -> &str {
        match self.colon {
            Some(i) => &self.raw[i + 1..],
            None => &self.raw,
        }
    }

    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.colon.map(|i| &self.raw[..i])
    }
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Hash for QualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialEq<str> for QualifiedName {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for QualifiedName {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl From<&str> for QualifiedName {
    fn from(raw: &str) -> Self {
        QualifiedName::new(raw)
    }
}

impl From<String> for QualifiedName {
    fn from(raw: String) -> Self {
        QualifiedName::new(raw)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
