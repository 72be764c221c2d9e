//! Object-mode view of a response payload.
//!
//! [`Document`] is a tagged tree where JSON object keys become named fields.
//! It is what [`crate::ElasticResponse::as_object`] decodes to, next to the
//! keyed-array view ([`serde_json::Value`]) returned by `as_array`.
//!
//! ```
//! use sift_core::Document;
//!
//! let doc = Document::from(serde_json::json!({"hits": {"total": {"value": 3}}}));
//! assert_eq!(doc.pointer("hits.total.value").and_then(Document::as_u64), Some(3));
//! ```

use serde_json::{Number, Value};

/// Named fields of a [`Document::Object`], in response order.
///
/// Lookup is linear; response objects are small and order matters more.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, Document)>);

impl Fields {
    /// Field by name. The last occurrence wins on duplicate names.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Document> {
        self.0
            .iter()
            .rev()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    /// `true` if the field exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Field names, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    /// `(name, value)` pairs, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Document)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, Document)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Fields {
    type Item = (String, Document);
    type IntoIter = std::vec::IntoIter<(String, Document)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A decoded payload node.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Object with named fields.
    Object(Fields),
    /// Ordered list.
    List(Vec<Document>),
    /// String value.
    Text(String),
    /// Number value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// `null`.
    Null,
}

impl Document {
    /// Named field of an object.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Object(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Item of a list.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Self> {
        match self {
            Self::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Follow a dotted path of field names and list indices.
    ///
    /// `"hits.hits.0._id"` reads the `_id` of the first hit.
    #[must_use]
    pub fn pointer(&self, path: &str) -> Option<&Self> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| match node {
                Self::Object(fields) => fields.get(segment),
                Self::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// Fields of an object.
    #[must_use]
    pub fn fields(&self) -> Option<&Fields> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Items of a list.
    #[must_use]
    pub fn items(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// String value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Signed integer value.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(number) => number.as_i64(),
            _ => None,
        }
    }

    /// Unsigned integer value.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(number) => number.as_u64(),
            _ => None,
        }
    }

    /// Floating point value.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => number.as_f64(),
            _ => None,
        }
    }

    /// Boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// `true` for [`Document::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(name, value)| (name, Self::from(value)))
                    .collect(),
            ),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::String(text) => Self::Text(text),
            Value::Number(number) => Self::Number(number),
            Value::Bool(value) => Self::Bool(value),
            Value::Null => Self::Null,
        }
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        match document {
            Document::Object(fields) => Self::Object(
                fields
                    .into_iter()
                    .map(|(name, document)| (name, Self::from(document)))
                    .collect(),
            ),
            Document::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Document::Text(text) => Self::String(text),
            Document::Number(number) => Self::Number(number),
            Document::Bool(value) => Self::Bool(value),
            Document::Null => Self::Null,
        }
    }
}

// ============================================================================
// Key
// ============================================================================

/// Lookup key for the keyed-array view.
///
/// Mirrors keyed-array semantics: an index on an object looks up its decimal
/// form, a numeric name on an array is used as an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key<'a> {
    /// Position (or numeric key).
    Index(usize),
    /// Object key.
    Name(&'a str),
}

impl Key<'_> {
    /// Look the key up in a JSON value.
    #[must_use]
    pub fn lookup<'v>(self, value: &'v Value) -> Option<&'v Value> {
        match (self, value) {
            (Self::Index(index), Value::Array(items)) => items.get(index),
            (Self::Index(index), Value::Object(map)) => map.get(&index.to_string()),
            (Self::Name(name), Value::Object(map)) => map.get(name),
            (Self::Name(name), Value::Array(items)) => {
                name.parse::<usize>().ok().and_then(|index| items.get(index))
            }
            _ => None,
        }
    }
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl std::fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}
