//! Scalar payloads carried by document nodes.
//!
//! A [`Value`] is the decoded form of one value-bearing tape slot: a tagged
//! scalar plus the `is_key` flag that distinguishes an object key from an
//! ordinary string. Containers reuse the same type — an object or array that
//! sits behind a key carries that key in its own `value`, with `is_key` set.

use std::fmt;

/// One tagged scalar.
///
/// `None` marks a node that carries no payload at all (containers without a
/// key, freshly allocated cells, the document root).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Scalar {
    #[default]
    None,
    String(String),
    Int(i64),
    Uint(u64),
    Double(f64),
    Bool(bool),
    Null,
}

impl Scalar {
    /// The string payload, if this scalar is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Scalar::None)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::None => Ok(()),
            Scalar::String(s) => write!(f, "{s}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Uint(v) => write!(f, "{v}"),
            Scalar::Double(v) => write!(f, "{v:.6}"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Null => write!(f, "null"),
        }
    }
}

/// A scalar plus its key flag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Value {
    pub scalar: Scalar,
    pub is_key: bool,
}

impl Value {
    pub fn new(scalar: Scalar) -> Self {
        Self {
            scalar,
            is_key: false,
        }
    }

    /// A string value flagged as an object key.
    pub fn key<S: Into<String>>(name: S) -> Self {
        Self {
            scalar: Scalar::String(name.into()),
            is_key: true,
        }
    }

    /// True when the value is a string whose bytes equal `name` and the key
    /// flag is set.
    pub fn is_key_named(&self, name: &str) -> bool {
        self.is_key && self.scalar.as_str() == Some(name)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::new(scalar)
    }
}
