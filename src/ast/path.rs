use std::fmt;

use crate::value::Value;

/// A segment of a key path into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeySegment {
    /// Object member by name
    ///
    /// # Examples
    /// - `data__owner` → `Key("owner")`
    Key(String),

    /// Array element by position
    ///
    /// # Examples
    /// - `data__tags__0` → `[Key("tags"), Index(0)]`
    ///
    /// # Note
    /// An index never matches an object member whose name is the same
    /// digits; `$[0]` on an object finds nothing in the store either.
    Index(usize),
}

impl KeySegment {
    /// Builds a segment from an unquoted path word: digit-only words are
    /// indices.
    pub fn from_word(word: &str) -> Self {
        if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = word.parse::<usize>() {
                return KeySegment::Index(index);
            }
        }
        KeySegment::Key(word.to_string())
    }
}

// A key that reads back as the same key when written unquoted
fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !key.bytes().all(|b| b.is_ascii_digit())
        && !key.contains("__")
        && !key.ends_with('_')
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySegment::Key(k) if is_plain_key(k) => write!(f, "{k}"),
            KeySegment::Key(k) => write!(f, "{k:?}"),
            KeySegment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// A sequence of key segments addressing a nested position in a document.
///
/// An empty path addresses the column itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath(Vec<KeySegment>);

impl KeyPath {
    pub fn new(segments: Vec<KeySegment>) -> Self {
        KeyPath(segments)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.0
    }

    pub fn push(&mut self, segment: KeySegment) {
        self.0.push(segment);
    }

    /// Walks `document` along this path.
    ///
    /// Returns `None` as soon as a segment does not exist. A segment that
    /// exists and holds JSON null yields `Some(&Value::Null)`; further
    /// segments below it yield `None`.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(document, |node, segment| match segment {
            KeySegment::Key(key) => node.get_key(key),
            KeySegment::Index(index) => node.get_index(*index),
        })
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "__{segment}")?;
        }
        Ok(())
    }
}

impl From<Vec<KeySegment>> for KeyPath {
    fn from(segments: Vec<KeySegment>) -> Self {
        KeyPath(segments)
    }
}
