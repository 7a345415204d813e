//! Generic decoded object graph
//!
//! Game data files are decoded by a [`GraphCodec`] into a tree of [`Value`]s.
//! Objects are [`Node`]s whose fields are addressed by name (see [`Field`] and
//! [`Dialect`]); field order and unknown fields are kept so that a re-encoded
//! graph differs from the input only where text was substituted.

mod codec;
mod field;

pub use codec::{GraphCodec, JsonCodec};
pub use field::{Dialect, Field};

use indexmap::IndexMap;

/// A value in the decoded object graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (`null` / `nil`).
    Nil,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 text.
    Str(String),
    /// Raw bytes (binary strings, compressed script blobs).
    Bytes(Vec<u8>),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Object with named fields.
    Object(Node),
}

/// An object node: an optional class name plus named fields in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// Class name recorded by the codec, if any.
    pub class: Option<String>,
    /// Named fields, in the order they were decoded.
    pub fields: IndexMap<String, Value>,
}

impl Node {
    /// Creates an empty node without a class.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty node with the given class name.
    #[must_use]
    pub fn with_class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field insertion.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Resolve the key actually used in this node for `field`.
    fn resolve_key(&self, field: Field, dialect: Dialect) -> Option<&str> {
        self.fields
            .keys()
            .find(|key| dialect.matches(field, key))
            .map(String::as_str)
    }

    /// Read a field by symbolic name.
    ///
    /// Returns `None` when the field is not present; absence is never an error.
    #[must_use]
    pub fn get(&self, field: Field, dialect: Dialect) -> Option<&Value> {
        let key = self.resolve_key(field, dialect)?;
        self.fields.get(key)
    }

    /// Mutable access to a field by symbolic name.
    pub fn get_mut(&mut self, field: Field, dialect: Dialect) -> Option<&mut Value> {
        let key = self.resolve_key(field, dialect)?.to_owned();
        self.fields.get_mut(&key)
    }

    /// Write a field by symbolic name.
    ///
    /// An existing field is overwritten in place (keeping its key and
    /// position); otherwise the field is appended under the dialect's
    /// canonical key. Returns the previous value, if any.
    pub fn set(&mut self, field: Field, dialect: Dialect, value: Value) -> Option<Value> {
        if let Some(slot) = self.get_mut(field, dialect) {
            return Some(std::mem::replace(slot, value));
        }
        self.fields.insert(dialect.key(field).to_owned(), value);
        None
    }

    /// Text content of a field, if it is present and a string.
    #[must_use]
    pub fn get_str(&self, field: Field, dialect: Dialect) -> Option<&str> {
        self.get(field, dialect).and_then(Value::as_str)
    }
}

impl Value {
    /// Returns the text if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the elements if this is an `Array`.
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable elements if this is an `Array`.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the node if this is an `Object`.
    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Object(node) => Some(node),
            _ => None,
        }
    }

    /// Mutable node if this is an `Object`.
    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Value::Object(node) => Some(node),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Object(node)
    }
}
